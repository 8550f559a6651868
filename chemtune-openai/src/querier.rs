use async_trait::async_trait;
use chemtune_core::{Completion, CoreError, FormattedDataset, Querier, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::HttpClient;
use crate::config::OpenAiConfig;
use crate::error::{OpenAiError, OpenAiResult};

const DEFAULT_MAX_TOKENS: u32 = 10;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    logprobs: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
    logprobs: Option<serde_json::Value>,
}

/// Runs held-out prompts against a tuned model, one request per prompt,
/// greedy decoding.
pub struct OpenAiQuerier {
    client: HttpClient,
    max_tokens: u32,
}

impl OpenAiQuerier {
    pub fn new(config: OpenAiConfig) -> OpenAiResult<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl Querier for OpenAiQuerier {
    async fn query(
        &self,
        model_id: &str,
        test: &FormattedDataset,
        logprobs: Option<usize>,
    ) -> Result<Vec<Completion>> {
        let mut completions = Vec::with_capacity(test.len());
        for (i, sample) in test.samples.iter().enumerate() {
            let request = CompletionRequest {
                model: model_id,
                prompt: &sample.prompt,
                max_tokens: self.max_tokens,
                temperature: 0.0,
                logprobs,
            };
            let response: CompletionResponse = self
                .client
                .post_json("/completions", &request)
                .await
                .map_err(CoreError::from)?;
            let choice = response.choices.into_iter().next().ok_or_else(|| {
                CoreError::from(OpenAiError::Decode("completion response had no choices".into()))
            })?;
            debug!(index = i, total = test.len(), "received completion");
            completions.push(Completion {
                text: choice.text,
                token_logprobs: choice.logprobs,
            });
        }
        Ok(completions)
    }
}
