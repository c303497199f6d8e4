use super::poll::{batch_status, poll_until, run_status, PollOutcome, PollPolicy};
use super::progress::{GenerationState, ProgressLog};
use super::prompt::{minutes_instructions, ASSISTANT_INSTRUCTIONS, VECTOR_STORE_NAME};
use super::request::ValidatedRequest;
use super::resources::RemoteResources;
use crate::openai::{ApiError, AssistantApi, ExpiresAfter, Tool};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Days of inactivity after which the provider drops a vector store
const VECTOR_STORE_EXPIRY_DAYS: u32 = 1;

/// Turns uploaded documents into minutes text through the assistant API
pub struct MinutesGenerator {
    api: Arc<dyn AssistantApi>,
    model: String,
    poll: PollPolicy,
}

impl MinutesGenerator {
    pub fn new(api: Arc<dyn AssistantApi>, model: impl Into<String>, poll: PollPolicy) -> Self {
        Self {
            api,
            model: model.into(),
            poll,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api(&self) -> &dyn AssistantApi {
        self.api.as_ref()
    }

    /// Index `files`, run the assistant once and return the newest message's
    /// first text block.
    ///
    /// Every remote id is recorded in `resources` as soon as it exists, so the
    /// caller can release them whether this succeeds or not.
    pub async fn generate(
        &self,
        request: &ValidatedRequest,
        files: &[PathBuf],
        resources: &mut RemoteResources,
        progress: &mut ProgressLog,
    ) -> Result<String> {
        if files.is_empty() {
            anyhow::bail!("No files to index");
        }

        progress.transition(GenerationState::Indexing);

        let thread = self
            .api
            .create_thread()
            .await
            .context("Failed to create thread")?;
        resources.thread_id = Some(thread.id.clone());

        let store = self
            .api
            .create_vector_store(
                VECTOR_STORE_NAME,
                ExpiresAfter::last_active(VECTOR_STORE_EXPIRY_DAYS),
            )
            .await
            .context("Failed to create vector store")?;
        resources.vector_store_id = Some(store.id.clone());

        for path in files {
            let file = self
                .api
                .upload_file(path)
                .await
                .with_context(|| format!("Failed to upload {}", path.display()))?;
            resources.uploaded_file_ids.push(file.id);
        }

        let batch = self
            .api
            .create_file_batch(&store.id, &resources.uploaded_file_ids)
            .await
            .context("Failed to start indexing")?;

        let api = Arc::clone(&self.api);
        let outcome = poll_until(&self.poll, || {
            let api = Arc::clone(&api);
            let store_id = store.id.clone();
            let batch_id = batch.id.clone();
            async move {
                let batch = api.get_file_batch(&store_id, &batch_id).await?;
                Ok::<_, ApiError>(batch_status(batch))
            }
        })
        .await
        .context("Failed to poll indexing")?;

        match outcome {
            PollOutcome::Completed(batch) => info!(
                "Indexed {} file(s) into vector store {}",
                batch.file_counts.completed, store.id
            ),
            PollOutcome::Failed(reason) => anyhow::bail!("Indexing failed: {}", reason),
            PollOutcome::TimedOut => anyhow::bail!(
                "Indexing did not finish within {:?}",
                self.poll.timeout
            ),
        }

        progress.push(format!("📄 총 {}개의 파일을 분석 중...", files.len()));

        let assistant = self
            .api
            .create_assistant(&self.model, ASSISTANT_INSTRUCTIONS, &[Tool::file_search()])
            .await
            .context("Failed to create assistant")?;
        resources.assistant_id = Some(assistant.id.clone());

        self.api
            .attach_vector_store(&assistant.id, &store.id)
            .await
            .context("Failed to attach vector store to assistant")?;

        progress.transition(GenerationState::Prompting);

        let instructions = minutes_instructions(&request.meeting_name, &request.meeting_topic);
        let run = self
            .api
            .create_run(&thread.id, &assistant.id, &instructions)
            .await
            .context("Failed to start run")?;

        let outcome = poll_until(&self.poll, || {
            let api = Arc::clone(&api);
            let thread_id = thread.id.clone();
            let run_id = run.id.clone();
            async move {
                let run = api.get_run(&thread_id, &run_id).await?;
                Ok::<_, ApiError>(run_status(run))
            }
        })
        .await
        .context("Failed to poll run")?;

        match outcome {
            PollOutcome::Completed(run) => info!("Run {} completed", run.id),
            PollOutcome::Failed(reason) => anyhow::bail!("Generation failed: {}", reason),
            PollOutcome::TimedOut => anyhow::bail!(
                "Generation did not finish within {:?}",
                self.poll.timeout
            ),
        }

        progress.transition(GenerationState::ExtractingResult);

        let messages = self
            .api
            .list_messages(&thread.id)
            .await
            .context("Failed to list messages")?;

        let text = messages
            .first()
            .and_then(|m| m.first_text())
            .ok_or_else(|| {
                ApiError::MissingContent(format!("thread {} has no text reply", thread.id))
            })?;

        Ok(text.to_string())
    }
}
