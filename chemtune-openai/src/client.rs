use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::OpenAiConfig;
use crate::error::{OpenAiError, OpenAiResult};

/// Thin JSON client over the remote API. Bearer auth, bounded retry with
/// exponential backoff on rate limits and server errors.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    config: Arc<OpenAiConfig>,
}

impl HttpClient {
    pub fn new(config: OpenAiConfig) -> OpenAiResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key);
        let mut auth_value = HeaderValue::from_str(&auth)
            .map_err(|_| OpenAiError::Config("API key contains invalid characters".into()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> OpenAiResult<T> {
        let response = self.execute_with_retry(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> OpenAiResult<T> {
        let payload = serde_json::to_string(body)
            .map_err(|e| OpenAiError::Decode(format!("request serialization: {e}")))?;
        let response = self
            .execute_with_retry(Method::POST, path, Some(payload))
            .await?;
        Self::decode(response).await
    }

    /// Multipart file upload. Not retried, the body is consumed on send.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
        purpose: &str,
    ) -> OpenAiResult<T> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", purpose.to_string())
            .part("file", part);

        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::decode(Self::check_status(response).await?).await
    }

    async fn execute_with_retry(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> OpenAiResult<Response> {
        let url = self.url(path);
        let mut backoff = Duration::from_secs(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let mut request = self.client.request(method.clone(), &url);
            if let Some(ref payload) = body {
                request = request
                    .header(CONTENT_TYPE, "application/json")
                    .body(payload.clone());
            }

            let err = match request.send().await {
                Ok(response) => match Self::check_status(response).await {
                    Ok(ok) => return Ok(ok),
                    Err(err) => err,
                },
                Err(err) => OpenAiError::Network(err),
            };

            if attempt > self.config.max_retries || !Self::is_retryable(&err) {
                return Err(err);
            }

            let delay = match err {
                OpenAiError::RateLimited { retry_after } => Duration::from_secs(retry_after),
                _ => backoff,
            };
            warn!(%url, attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying request");
            tokio::time::sleep(delay).await;
            backoff = backoff.saturating_mul(2);
        }
    }

    async fn check_status(response: Response) -> OpenAiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let text = response.text().await.unwrap_or_default();
        Err(Self::status_error(status, text, retry_after))
    }

    fn status_error(status: StatusCode, body: String, retry_after: Option<u64>) -> OpenAiError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                OpenAiError::Authentication(format!("{status}: {body}"))
            }
            StatusCode::TOO_MANY_REQUESTS => OpenAiError::RateLimited {
                retry_after: retry_after.unwrap_or(5),
            },
            s if s.is_server_error() => OpenAiError::Server(format!("{status}: {body}")),
            _ => OpenAiError::Decode(format!("{status}: {body}")),
        }
    }

    fn is_retryable(err: &OpenAiError) -> bool {
        match err {
            OpenAiError::RateLimited { .. } | OpenAiError::Server(_) => true,
            OpenAiError::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> OpenAiResult<T> {
        let text = response.text().await?;
        debug!(bytes = text.len(), "decoding response body");
        serde_json::from_str(&text).map_err(|e| OpenAiError::Decode(format!("{e}: {text}")))
    }
}
