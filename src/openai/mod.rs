//! Hosted assistant provider boundary
//!
//! `AssistantApi` lists the remote operations minutes generation needs;
//! `OpenAiClient` implements them over the OpenAI Assistants v2 REST API.

pub mod api;
pub mod client;
pub mod error;
pub mod messages;

pub use api::AssistantApi;
pub use client::OpenAiClient;
pub use error::ApiError;
pub use messages::{
    Assistant, ExpiresAfter, FileBatch, FileCounts, FileObject, Message, MessageContent, Run,
    RunError, Thread, Tool, VectorStore, VectorStoreFile,
};
