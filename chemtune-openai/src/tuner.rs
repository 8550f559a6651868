use std::path::PathBuf;

use async_trait::async_trait;
use chemtune_core::{CoreError, FormattedDataset, Result, Tuner, TuneOutcome, TuningParams};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::HttpClient;
use crate::config::OpenAiConfig;
use crate::error::{OpenAiError, OpenAiResult};

const DEFAULT_BASE_MODEL: &str = "babbage-002";
const TRAIN_FILE_NAME: &str = "train.jsonl";

#[derive(Debug, Serialize)]
struct TrainRecord<'a> {
    prompt: &'a str,
    completion: &'a str,
}

#[derive(Debug, Serialize)]
struct Hyperparameters {
    n_epochs: u32,
    learning_rate_multiplier: f64,
}

#[derive(Debug, Serialize)]
struct WandbIntegration {
    r#type: &'static str,
}

#[derive(Debug, Serialize)]
struct FineTuneRequest<'a> {
    training_file: &'a str,
    model: &'a str,
    hyperparameters: Hyperparameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    integrations: Option<Vec<WandbIntegration>>,
}

#[derive(Debug, Deserialize)]
struct FileObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FineTuneJob {
    id: String,
    status: String,
    fine_tuned_model: Option<String>,
}

/// Fine-tunes a base completion model on a formatted training table and
/// blocks until the remote job reaches a terminal state.
///
/// Every call creates a fresh run directory under the configured `runs_dir`
/// and leaves the uploaded JSONL there for audit.
pub struct OpenAiTuner {
    client: HttpClient,
    params: TuningParams,
}

impl OpenAiTuner {
    pub fn new(config: OpenAiConfig, params: TuningParams) -> OpenAiResult<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            params,
        })
    }

    pub fn with_client(client: HttpClient, params: TuningParams) -> Self {
        Self { client, params }
    }

    fn create_outdir(&self) -> OpenAiResult<PathBuf> {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let uuid = Uuid::new_v4().simple().to_string();
        let outdir = self
            .client
            .config()
            .runs_dir
            .join(format!("{stamp}_{}", &uuid[..8]));
        std::fs::create_dir_all(&outdir)?;
        Ok(outdir)
    }

    fn to_jsonl(train: &FormattedDataset) -> Result<String> {
        let mut out = String::new();
        for sample in &train.samples {
            let record = TrainRecord {
                prompt: &sample.prompt,
                completion: &sample.completion,
            };
            out.push_str(&serde_json::to_string(&record)?);
            out.push('\n');
        }
        Ok(out)
    }

    async fn poll_job(&self, job_id: &str) -> OpenAiResult<String> {
        loop {
            let job: FineTuneJob = self
                .client
                .get_json(&format!("/fine_tuning/jobs/{job_id}"))
                .await?;
            debug!(job_id, status = %job.status, "polled fine-tuning job");
            match job.status.as_str() {
                "succeeded" => {
                    return job.fine_tuned_model.ok_or_else(|| {
                        OpenAiError::Decode(format!(
                            "job {job_id} succeeded without a fine_tuned_model"
                        ))
                    });
                }
                "failed" | "cancelled" => {
                    return Err(OpenAiError::JobFailed {
                        job_id: job_id.to_string(),
                        status: job.status,
                    });
                }
                _ => tokio::time::sleep(self.client.config().poll_interval).await,
            }
        }
    }
}

#[async_trait]
impl Tuner for OpenAiTuner {
    async fn fine_tune(&self, train: &FormattedDataset) -> Result<TuneOutcome> {
        if train.is_empty() {
            return Err(CoreError::Validation(
                "cannot fine-tune on an empty training set".into(),
            ));
        }

        let outdir = self.create_outdir().map_err(CoreError::from)?;
        let jsonl = Self::to_jsonl(train)?;
        std::fs::write(outdir.join(TRAIN_FILE_NAME), &jsonl)?;

        let file: FileObject = self
            .client
            .upload("/files", TRAIN_FILE_NAME, jsonl.into_bytes(), "fine-tune")
            .await
            .map_err(CoreError::from)?;
        debug!(file_id = %file.id, rows = train.len(), "uploaded training file");

        let base_model = self
            .params
            .base_model
            .as_deref()
            .unwrap_or(DEFAULT_BASE_MODEL);
        let request = FineTuneRequest {
            training_file: &file.id,
            model: base_model,
            hyperparameters: Hyperparameters {
                n_epochs: self.params.n_epochs,
                learning_rate_multiplier: self.params.learning_rate_multiplier,
            },
            integrations: self
                .params
                .experiment_tracking
                .then(|| vec![WandbIntegration { r#type: "wandb" }]),
        };
        let job: FineTuneJob = self
            .client
            .post_json("/fine_tuning/jobs", &request)
            .await
            .map_err(CoreError::from)?;
        info!(job_id = %job.id, base_model, rows = train.len(), "submitted fine-tuning job");

        let model_id = self.poll_job(&job.id).await.map_err(CoreError::from)?;
        info!(%model_id, "fine-tuning succeeded");

        Ok(TuneOutcome { model_id, outdir })
    }
}
