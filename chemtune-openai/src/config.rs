use std::path::PathBuf;
use std::time::Duration;

use crate::error::{OpenAiError, OpenAiResult};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for the remote service plus the local directory the
/// per-run artifacts land in.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub runs_dir: PathBuf,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub max_retries: usize,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            runs_dir: PathBuf::from("runs"),
            poll_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    /// Credential comes from the environment, optionally seeded from a
    /// `.env` file by the caller.
    pub fn from_env() -> OpenAiResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAiError::Authentication("OPENAI_API_KEY is not set".into()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_runs_dir(mut self, runs_dir: impl Into<PathBuf>) -> Self {
        self.runs_dir = runs_dir.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn validate(&self) -> OpenAiResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(OpenAiError::Config("empty API key".into()));
        }
        if !self.base_url.starts_with("http") {
            return Err(OpenAiError::Config(format!(
                "base URL {:?} is not an http(s) URL",
                self.base_url
            )));
        }
        Ok(())
    }
}
