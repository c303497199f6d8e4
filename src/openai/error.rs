use thiserror::Error;

/// Failures talking to the assistant provider
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, TLS, decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// A local file could not be read for upload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response lacked the content we asked for
    #[error("Missing content: {0}")]
    MissingContent(String),
}

impl ApiError {
    /// Whether the provider reported the resource as gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Api { status: 404, .. })
    }
}
