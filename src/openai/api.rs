use super::error::ApiError;
use super::messages::{
    Assistant, ExpiresAfter, FileBatch, FileObject, Message, Run, Thread, Tool, VectorStore,
    VectorStoreFile,
};
use std::path::Path;

/// Remote operations used to generate minutes
///
/// Implementations:
/// - `OpenAiClient`: the hosted OpenAI Assistants v2 API
/// - test fakes that record created and deleted resources
#[async_trait::async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create an empty conversation thread
    async fn create_thread(&self) -> Result<Thread, ApiError>;

    /// Create a vector store with the given expiry policy
    async fn create_vector_store(
        &self,
        name: &str,
        expires_after: ExpiresAfter,
    ) -> Result<VectorStore, ApiError>;

    /// Upload a local file for assistant use
    async fn upload_file(&self, path: &Path) -> Result<FileObject, ApiError>;

    /// Start indexing already uploaded files into a vector store
    async fn create_file_batch(
        &self,
        vector_store_id: &str,
        file_ids: &[String],
    ) -> Result<FileBatch, ApiError>;

    async fn get_file_batch(
        &self,
        vector_store_id: &str,
        batch_id: &str,
    ) -> Result<FileBatch, ApiError>;

    async fn create_assistant(
        &self,
        model: &str,
        instructions: &str,
        tools: &[Tool],
    ) -> Result<Assistant, ApiError>;

    /// Bind a vector store to the assistant's file search tool
    async fn attach_vector_store(
        &self,
        assistant_id: &str,
        vector_store_id: &str,
    ) -> Result<Assistant, ApiError>;

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Run, ApiError>;

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError>;

    /// Messages of a thread, newest first
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>, ApiError>;

    async fn list_vector_store_files(
        &self,
        vector_store_id: &str,
    ) -> Result<Vec<VectorStoreFile>, ApiError>;

    async fn delete_file(&self, file_id: &str) -> Result<(), ApiError>;

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<(), ApiError>;

    async fn delete_assistant(&self, assistant_id: &str) -> Result<(), ApiError>;
}
