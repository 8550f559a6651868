use chemtune_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("Fine-tuning job {job_id} ended as {status}")]
    JobFailed { job_id: String, status: String },

    #[error("Server error: {0}")]
    Server(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type OpenAiResult<T> = std::result::Result<T, OpenAiError>;

impl From<OpenAiError> for CoreError {
    fn from(err: OpenAiError) -> Self {
        CoreError::RemoteService(err.to_string())
    }
}
