use super::api::AssistantApi;
use super::error::ApiError;
use super::messages::{
    Assistant, CreateAssistantRequest, CreateFileBatchRequest, CreateRunRequest,
    CreateVectorStoreRequest, ErrorEnvelope, ExpiresAfter, FileBatch, FileObject,
    FileSearchResources, ListResponse, Message, Run, Thread, Tool, ToolResources,
    UpdateAssistantRequest, VectorStore, VectorStoreFile,
};
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

/// Client for the OpenAI Assistants v2 REST API
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a request with authentication and the assistants beta header
    fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            Err(ApiError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.build_request(Method::DELETE, path).send().await?;
        let _: serde_json::Value = Self::parse(response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AssistantApi for OpenAiClient {
    async fn create_thread(&self) -> Result<Thread, ApiError> {
        let response = self
            .build_request(Method::POST, "/threads")
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let thread: Thread = Self::parse(response).await?;
        info!("Created thread {}", thread.id);
        Ok(thread)
    }

    async fn create_vector_store(
        &self,
        name: &str,
        expires_after: ExpiresAfter,
    ) -> Result<VectorStore, ApiError> {
        let response = self
            .build_request(Method::POST, "/vector_stores")
            .json(&CreateVectorStoreRequest {
                name,
                expires_after,
            })
            .send()
            .await?;

        let store: VectorStore = Self::parse(response).await?;
        info!("Created vector store {} ({})", store.id, name);
        Ok(store)
    }

    async fn upload_file(&self, path: &Path) -> Result<FileObject, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let form = multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", multipart::Part::bytes(bytes).file_name(file_name.clone()));

        let response = self
            .build_request(Method::POST, "/files")
            .multipart(form)
            .send()
            .await?;

        let file: FileObject = Self::parse(response).await?;
        info!("Uploaded {} as {}", file_name, file.id);
        Ok(file)
    }

    async fn create_file_batch(
        &self,
        vector_store_id: &str,
        file_ids: &[String],
    ) -> Result<FileBatch, ApiError> {
        let response = self
            .build_request(
                Method::POST,
                &format!("/vector_stores/{}/file_batches", vector_store_id),
            )
            .json(&CreateFileBatchRequest { file_ids })
            .send()
            .await?;

        let batch: FileBatch = Self::parse(response).await?;
        info!(
            "Created file batch {} for vector store {} ({} files)",
            batch.id,
            vector_store_id,
            file_ids.len()
        );
        Ok(batch)
    }

    async fn get_file_batch(
        &self,
        vector_store_id: &str,
        batch_id: &str,
    ) -> Result<FileBatch, ApiError> {
        let response = self
            .build_request(
                Method::GET,
                &format!("/vector_stores/{}/file_batches/{}", vector_store_id, batch_id),
            )
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn create_assistant(
        &self,
        model: &str,
        instructions: &str,
        tools: &[Tool],
    ) -> Result<Assistant, ApiError> {
        let response = self
            .build_request(Method::POST, "/assistants")
            .json(&CreateAssistantRequest {
                model,
                instructions,
                tools,
            })
            .send()
            .await?;

        let assistant: Assistant = Self::parse(response).await?;
        info!("Created assistant {} (model={})", assistant.id, model);
        Ok(assistant)
    }

    async fn attach_vector_store(
        &self,
        assistant_id: &str,
        vector_store_id: &str,
    ) -> Result<Assistant, ApiError> {
        let response = self
            .build_request(Method::POST, &format!("/assistants/{}", assistant_id))
            .json(&UpdateAssistantRequest {
                tool_resources: ToolResources {
                    file_search: FileSearchResources {
                        vector_store_ids: vec![vector_store_id.to_string()],
                    },
                },
            })
            .send()
            .await?;

        let assistant: Assistant = Self::parse(response).await?;
        info!(
            "Attached vector store {} to assistant {}",
            vector_store_id, assistant.id
        );
        Ok(assistant)
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Run, ApiError> {
        let response = self
            .build_request(Method::POST, &format!("/threads/{}/runs", thread_id))
            .json(&CreateRunRequest {
                assistant_id,
                instructions,
            })
            .send()
            .await?;

        let run: Run = Self::parse(response).await?;
        info!("Created run {} on thread {}", run.id, thread_id);
        Ok(run)
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError> {
        let response = self
            .build_request(
                Method::GET,
                &format!("/threads/{}/runs/{}", thread_id, run_id),
            )
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>, ApiError> {
        let response = self
            .build_request(Method::GET, &format!("/threads/{}/messages", thread_id))
            .query(&[("order", "desc")])
            .send()
            .await?;

        let list: ListResponse<Message> = Self::parse(response).await?;
        Ok(list.data)
    }

    async fn list_vector_store_files(
        &self,
        vector_store_id: &str,
    ) -> Result<Vec<VectorStoreFile>, ApiError> {
        let path = format!("/vector_stores/{}/files", vector_store_id);
        let mut files: Vec<VectorStoreFile> = Vec::new();

        loop {
            let mut request = self
                .build_request(Method::GET, &path)
                .query(&[("limit", "100")]);
            if let Some(last) = files.last() {
                request = request.query(&[("after", last.id.as_str())]);
            }

            let page: ListResponse<VectorStoreFile> = Self::parse(request.send().await?).await?;
            let has_more = page.has_more && !page.data.is_empty();
            files.extend(page.data);

            if !has_more {
                break;
            }
        }

        Ok(files)
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/files/{}", file_id)).await?;
        info!("Deleted file {}", file_id);
        Ok(())
    }

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/vector_stores/{}", vector_store_id))
            .await?;
        info!("Deleted vector store {}", vector_store_id);
        Ok(())
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/assistants/{}", assistant_id)).await?;
        info!("Deleted assistant {}", assistant_id);
        Ok(())
    }
}
