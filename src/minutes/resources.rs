use crate::openai::{ApiError, AssistantApi};
use std::collections::HashSet;
use tracing::{info, warn};

/// Remote resources created during one generation, recorded as they appear
#[derive(Debug, Clone, Default)]
pub struct RemoteResources {
    pub thread_id: Option<String>,
    pub vector_store_id: Option<String>,
    pub uploaded_file_ids: Vec<String>,
    pub assistant_id: Option<String>,
}

impl RemoteResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.thread_id.is_none()
            && self.vector_store_id.is_none()
            && self.uploaded_file_ids.is_empty()
            && self.assistant_id.is_none()
    }

    /// Delete everything recorded, files before their vector store.
    ///
    /// Every deletion is attempted once; failures are collected and returned.
    /// Resources the provider already reports as gone count as deleted.
    pub async fn release(self, api: &dyn AssistantApi) -> Vec<String> {
        let mut errors = Vec::new();
        let mut attempted: HashSet<String> = HashSet::new();

        if let Some(store_id) = &self.vector_store_id {
            match api.list_vector_store_files(store_id).await {
                Ok(files) => {
                    for file in files {
                        let result = api.delete_file(&file.id).await;
                        delete_step(result, "file", &file.id, &mut errors);
                        attempted.insert(file.id);
                    }
                }
                Err(e) => {
                    warn!("Failed to list files of vector store {}: {}", store_id, e);
                    errors.push(format!("list files of vector store {}: {}", store_id, e));
                }
            }
        }

        // Uploads that never made it into the store
        for file_id in &self.uploaded_file_ids {
            if !attempted.contains(file_id) {
                delete_step(api.delete_file(file_id).await, "file", file_id, &mut errors);
            }
        }

        if let Some(store_id) = &self.vector_store_id {
            delete_step(
                api.delete_vector_store(store_id).await,
                "vector store",
                store_id,
                &mut errors,
            );
        }

        if let Some(assistant_id) = &self.assistant_id {
            delete_step(
                api.delete_assistant(assistant_id).await,
                "assistant",
                assistant_id,
                &mut errors,
            );
        }

        if errors.is_empty() {
            info!("Released remote resources");
        } else {
            warn!("Remote cleanup finished with {} error(s)", errors.len());
        }

        errors
    }
}

fn delete_step(result: Result<(), ApiError>, kind: &str, id: &str, errors: &mut Vec<String>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_not_found() => info!("{} {} already gone", kind, id),
        Err(e) => {
            warn!("Failed to delete {} {}: {}", kind, id, e);
            errors.push(format!("delete {} {}: {}", kind, id, e));
        }
    }
}
