use async_trait::async_trait;

use crate::domain::{Completion, DataTable, FormattedDataset, Label, TuneOutcome};
use crate::error::Result;

/// Named metric values, as persisted in a run summary.
pub type MetricMap = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait DatasetLoader: Send + Sync {
    async fn load(&self) -> Result<DataTable>;
}

/// Boundary to the remote fine-tuning service.
#[async_trait]
pub trait Tuner: Send + Sync {
    async fn fine_tune(&self, train: &FormattedDataset) -> Result<TuneOutcome>;
}

/// Boundary to the remote completion service for a tuned model.
#[async_trait]
pub trait Querier: Send + Sync {
    async fn query(
        &self,
        model_id: &str,
        test: &FormattedDataset,
        logprobs: Option<usize>,
    ) -> Result<Vec<Completion>>;
}

/// A non-fine-tuned reference predictor trained and scored on the same split.
#[async_trait]
pub trait BaselineModel: Send + Sync {
    fn name(&self) -> &str;

    async fn train_test(
        &self,
        train: &FormattedDataset,
        test: &FormattedDataset,
    ) -> Result<MetricMap>;
}

/// Turns raw records into (text, label) pairs.
pub trait Formatter: Send + Sync {
    fn format(&self, table: &DataTable) -> Result<FormattedDataset>;
}

/// Parses raw completions back into structured predictions, positionally
/// aligned with the input.
pub trait Extractor: Send + Sync {
    fn extract(&self, completions: &[Completion]) -> Vec<Option<Label>>;
}

pub trait Evaluator: Send + Sync {
    fn evaluate(&self, truth: &[Label], predictions: &[Option<Label>]) -> Result<MetricMap>;
}
