// In-memory assistant provider shared by the integration tests.
//
// Tracks every resource it hands out so tests can check what was created
// and what is still alive after a generation.

#![allow(dead_code)]

use meeting_minutes::minutes::PollPolicy;
use meeting_minutes::openai::messages::{FileCounts, TextContent};
use meeting_minutes::openai::{
    ApiError, Assistant, AssistantApi, ExpiresAfter, FileBatch, FileObject, Message,
    MessageContent, Run, Thread, Tool, VectorStore, VectorStoreFile,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

pub const SAMPLE_MINUTES: &str = "# Q1 Planning 회의록
<table style=\"width:80%; border-collapse: collapse;\" border=\"1\">
    <tr><th><strong>날짜</strong></th><td></td></tr>
    <tr><th><strong>장소</strong></th><td></td></tr>
    <tr><th><strong>회의 매니저</strong></th><td></td></tr>
    <tr><th><strong>회의 기록자</strong></th><td></td></tr>
    <tr><th><strong>회의 참여자</strong></th><td></td></tr>
    <tr><th><strong>참조</strong></th><td></td></tr>
</table>

## **아젠다**
*   Roadmap priorities for Q1

## 회의 내용
### 1. Roadmap
*   Ship the upload flow first

## 랩업
*   **Action Items**
    - Draft the Q1 roadmap
*   **결정 사항**
    - Upload flow ships first
";

#[derive(Debug, Default)]
pub struct FakeState {
    next_id: usize,
    threads: HashSet<String>,
    vector_stores: HashMap<String, Vec<String>>,
    expiry: Vec<ExpiresAfter>,
    files: HashSet<String>,
    uploaded_names: Vec<String>,
    assistants: HashMap<String, Option<String>>,
    runs: HashMap<String, String>,
    run_instructions: Vec<String>,
    calls: Vec<String>,
}

/// Scriptable fake of the hosted assistant API
#[derive(Debug)]
pub struct FakeAssistantApi {
    pub state: Mutex<FakeState>,
    /// Text of the assistant's reply
    pub reply: String,
    /// Terminal status runs end in
    pub run_status: String,
    /// Terminal status file batches end in ("in_progress" never finishes)
    pub batch_status: String,
    /// Operation name that fails with a 500
    pub fail_on: Option<&'static str>,
    /// Whether file deletions fail with a 500
    pub fail_file_deletes: bool,
}

impl Default for FakeAssistantApi {
    fn default() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            reply: SAMPLE_MINUTES.to_string(),
            run_status: "completed".to_string(),
            batch_status: "completed".to_string(),
            fail_on: None,
            fail_file_deletes: false,
        }
    }
}

impl FakeAssistantApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn enter(&self, op: &'static str) -> Result<std::sync::MutexGuard<'_, FakeState>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op.to_string());
        if self.fail_on == Some(op) {
            return Err(ApiError::Api {
                status: 500,
                message: format!("{} failed", op),
            });
        }
        Ok(state)
    }

    fn id(state: &mut FakeState, prefix: &str) -> String {
        state.next_id += 1;
        format!("{}_{}", prefix, state.next_id)
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Api {
            status: 404,
            message: format!("No such {}", what),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Remote files, vector stores and assistants still alive
    pub fn live_resources(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.files.len() + state.vector_stores.len() + state.assistants.len()
    }

    pub fn live_files(&self) -> usize {
        self.state.lock().unwrap().files.len()
    }

    pub fn live_vector_stores(&self) -> usize {
        self.state.lock().unwrap().vector_stores.len()
    }

    pub fn live_assistants(&self) -> usize {
        self.state.lock().unwrap().assistants.len()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.state.lock().unwrap().uploaded_names.clone()
    }

    pub fn expiry_policies(&self) -> Vec<ExpiresAfter> {
        self.state.lock().unwrap().expiry.clone()
    }

    pub fn run_instructions(&self) -> Vec<String> {
        self.state.lock().unwrap().run_instructions.clone()
    }
}

#[async_trait::async_trait]
impl AssistantApi for FakeAssistantApi {
    async fn create_thread(&self) -> Result<Thread, ApiError> {
        let mut state = self.enter("create_thread")?;
        let id = Self::id(&mut state, "thread");
        state.threads.insert(id.clone());
        Ok(Thread { id })
    }

    async fn create_vector_store(
        &self,
        name: &str,
        expires_after: ExpiresAfter,
    ) -> Result<VectorStore, ApiError> {
        let mut state = self.enter("create_vector_store")?;
        let id = Self::id(&mut state, "vs");
        state.vector_stores.insert(id.clone(), Vec::new());
        state.expiry.push(expires_after);
        Ok(VectorStore {
            id,
            name: Some(name.to_string()),
            status: Some("completed".to_string()),
        })
    }

    async fn upload_file(&self, path: &Path) -> Result<FileObject, ApiError> {
        let bytes = std::fs::read(path)?;
        let mut state = self.enter("upload_file")?;
        let id = Self::id(&mut state, "file");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        state.files.insert(id.clone());
        state.uploaded_names.push(format!("{} ({} bytes)", name, bytes.len()));
        Ok(FileObject {
            id,
            filename: Some(name),
        })
    }

    async fn create_file_batch(
        &self,
        vector_store_id: &str,
        file_ids: &[String],
    ) -> Result<FileBatch, ApiError> {
        let mut state = self.enter("create_file_batch")?;
        let store = state
            .vector_stores
            .get_mut(vector_store_id)
            .ok_or_else(|| Self::not_found("vector store"))?;
        store.extend(file_ids.iter().cloned());
        let id = Self::id(&mut state, "batch");
        Ok(FileBatch {
            id,
            status: "in_progress".to_string(),
            file_counts: FileCounts {
                in_progress: file_ids.len() as u32,
                total: file_ids.len() as u32,
                ..FileCounts::default()
            },
        })
    }

    async fn get_file_batch(
        &self,
        vector_store_id: &str,
        batch_id: &str,
    ) -> Result<FileBatch, ApiError> {
        let state = self.enter("get_file_batch")?;
        let total = state
            .vector_stores
            .get(vector_store_id)
            .ok_or_else(|| Self::not_found("vector store"))?
            .len() as u32;
        let completed = if self.batch_status == "completed" { total } else { 0 };
        Ok(FileBatch {
            id: batch_id.to_string(),
            status: self.batch_status.clone(),
            file_counts: FileCounts {
                completed,
                failed: total - completed,
                total,
                ..FileCounts::default()
            },
        })
    }

    async fn create_assistant(
        &self,
        model: &str,
        _instructions: &str,
        tools: &[Tool],
    ) -> Result<Assistant, ApiError> {
        let mut state = self.enter("create_assistant")?;
        let id = Self::id(&mut state, "asst");
        state.assistants.insert(id.clone(), None);
        Ok(Assistant {
            id,
            model: Some(model.to_string()),
            tools: tools.to_vec(),
            tool_resources: None,
        })
    }

    async fn attach_vector_store(
        &self,
        assistant_id: &str,
        vector_store_id: &str,
    ) -> Result<Assistant, ApiError> {
        let mut state = self.enter("attach_vector_store")?;
        let slot = state
            .assistants
            .get_mut(assistant_id)
            .ok_or_else(|| Self::not_found("assistant"))?;
        *slot = Some(vector_store_id.to_string());
        Ok(Assistant {
            id: assistant_id.to_string(),
            model: None,
            tools: vec![Tool::file_search()],
            tool_resources: None,
        })
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Run, ApiError> {
        let mut state = self.enter("create_run")?;
        if !state.threads.contains(thread_id) {
            return Err(Self::not_found("thread"));
        }
        if state.assistants.get(assistant_id).cloned().flatten().is_none() {
            return Err(ApiError::Api {
                status: 400,
                message: "assistant has no vector store".to_string(),
            });
        }
        let id = Self::id(&mut state, "run");
        state.runs.insert(id.clone(), thread_id.to_string());
        state.run_instructions.push(instructions.to_string());
        Ok(Run {
            id,
            status: "queued".to_string(),
            last_error: None,
        })
    }

    async fn get_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, ApiError> {
        let _state = self.enter("get_run")?;
        Ok(Run {
            id: run_id.to_string(),
            status: self.run_status.clone(),
            last_error: None,
        })
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>, ApiError> {
        let state = self.enter("list_messages")?;
        if !state.threads.contains(thread_id) {
            return Err(Self::not_found("thread"));
        }
        Ok(vec![
            Message {
                id: "msg_2".to_string(),
                role: "assistant".to_string(),
                content: vec![MessageContent::Text {
                    text: TextContent {
                        value: self.reply.clone(),
                    },
                }],
            },
            Message {
                id: "msg_1".to_string(),
                role: "user".to_string(),
                content: Vec::new(),
            },
        ])
    }

    async fn list_vector_store_files(
        &self,
        vector_store_id: &str,
    ) -> Result<Vec<VectorStoreFile>, ApiError> {
        let state = self.enter("list_vector_store_files")?;
        let files = state
            .vector_stores
            .get(vector_store_id)
            .ok_or_else(|| Self::not_found("vector store"))?;
        Ok(files
            .iter()
            .map(|id| VectorStoreFile { id: id.clone() })
            .collect())
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), ApiError> {
        let mut state = self.enter("delete_file")?;
        if self.fail_file_deletes {
            return Err(ApiError::Api {
                status: 500,
                message: "delete failed".to_string(),
            });
        }
        if !state.files.remove(file_id) {
            return Err(Self::not_found("file"));
        }
        for files in state.vector_stores.values_mut() {
            files.retain(|f| f != file_id);
        }
        Ok(())
    }

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<(), ApiError> {
        let mut state = self.enter("delete_vector_store")?;
        match state.vector_stores.remove(vector_store_id) {
            Some(_) => Ok(()),
            None => Err(Self::not_found("vector store")),
        }
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<(), ApiError> {
        let mut state = self.enter("delete_assistant")?;
        match state.assistants.remove(assistant_id) {
            Some(_) => Ok(()),
            None => Err(Self::not_found("assistant")),
        }
    }
}

/// Polling tight enough for tests
pub fn fast_poll() -> PollPolicy {
    PollPolicy {
        initial_interval: Duration::from_millis(1),
        max_interval: Duration::from_millis(5),
        multiplier: 2.0,
        timeout: Duration::from_millis(200),
    }
}
