use serde::Serialize;
use std::fmt;
use tracing::info;

/// Where a generation currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    Idle,
    ValidatingInputs,
    ValidatingFiles,
    Indexing,
    Prompting,
    ExtractingResult,
    Persisting,
    CleaningUp,
    Done,
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationState::Idle => "idle",
            GenerationState::ValidatingInputs => "validating-inputs",
            GenerationState::ValidatingFiles => "validating-files",
            GenerationState::Indexing => "indexing",
            GenerationState::Prompting => "prompting",
            GenerationState::ExtractingResult => "extracting-result",
            GenerationState::Persisting => "persisting",
            GenerationState::CleaningUp => "cleaning-up",
            GenerationState::Done => "done",
        };
        f.write_str(name)
    }
}

/// User-visible progress text plus the states a generation went through
#[derive(Debug, Clone, Serialize)]
pub struct ProgressLog {
    state: GenerationState,
    history: Vec<GenerationState>,
    lines: Vec<String>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self {
            state: GenerationState::Idle,
            history: vec![GenerationState::Idle],
            lines: Vec::new(),
        }
    }

    pub fn transition(&mut self, next: GenerationState) {
        info!("Minutes generation: {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn history(&self) -> &[GenerationState] {
        &self.history
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The whole log as shown in the result area
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::new()
    }
}
