use serde::Deserialize;
use thiserror::Error;

/// Minutes request as entered by the user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingRequest {
    #[serde(default)]
    pub meeting_name: String,
    #[serde(default)]
    pub meeting_topic: String,
}

/// Request with trimmed, non-empty name and topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub meeting_name: String,
    pub meeting_topic: String,
}

/// Problems that abort a generation before any remote call.
/// The display text is the warning shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("⚠️ 회의 이름을 입력하세요!")]
    EmptyMeetingName,

    #[error("⚠️ 회의 주제를 입력하세요!")]
    EmptyMeetingTopic,

    #[error("⚠️ 업로드된 파일이 없습니다. 먼저 파일을 업로드하세요.")]
    NoUploadedFiles,
}

impl MeetingRequest {
    pub fn new(meeting_name: impl Into<String>, meeting_topic: impl Into<String>) -> Self {
        Self {
            meeting_name: meeting_name.into(),
            meeting_topic: meeting_topic.into(),
        }
    }

    /// Name is checked before topic
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let meeting_name = self.meeting_name.trim();
        if meeting_name.is_empty() {
            return Err(ValidationError::EmptyMeetingName);
        }

        let meeting_topic = self.meeting_topic.trim();
        if meeting_topic.is_empty() {
            return Err(ValidationError::EmptyMeetingTopic);
        }

        Ok(ValidatedRequest {
            meeting_name: meeting_name.to_string(),
            meeting_topic: meeting_topic.to_string(),
        })
    }
}
