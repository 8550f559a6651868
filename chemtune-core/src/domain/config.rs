use serde::{Deserialize, Serialize};

/// Hyperparameters passed through to the remote fine-tuning job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TuningParams {
    pub n_epochs: u32,
    pub learning_rate_multiplier: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_model: Option<String>,
    /// Remote experiment tracking (wandb-style). Off for sweeps.
    pub experiment_tracking: bool,
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            n_epochs: 8,
            learning_rate_multiplier: 0.02,
            base_model: None,
            experiment_tracking: false,
        }
    }
}

impl TuningParams {
    pub fn with_base_model(mut self, base_model: impl Into<String>) -> Self {
        self.base_model = Some(base_model.into());
        self
    }
}

/// How the formatted dataset is partitioned into train and test.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Train pool and test pool come from separate loaders; the train pool
    /// is subsampled to the requested size.
    Holdout,
    /// Stratified random split of one formatted table. The test side is
    /// capped at `min(max_test_points, len - train_size)`.
    Stratified { max_test_points: usize },
}

/// Where the labels live in the raw table and how the property is named in
/// prompts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetSpec {
    pub property_name: String,
    pub label_column: String,
    /// Drop rows with a missing representation or label before formatting.
    pub drop_missing: bool,
    /// Decimal digits used when rendering regression labels.
    pub num_label_digits: usize,
}

impl DatasetSpec {
    pub fn new(property_name: impl Into<String>, label_column: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            label_column: label_column.into(),
            drop_missing: false,
            num_label_digits: 2,
        }
    }

    pub fn with_drop_missing(mut self) -> Self {
        self.drop_missing = true;
        self
    }

    pub fn with_label_digits(mut self, digits: usize) -> Self {
        self.num_label_digits = digits;
        self
    }
}
