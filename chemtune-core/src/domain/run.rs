use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::params::ExperimentParams;
use super::representation::Representation;
use crate::traits::MetricMap;

/// Handle returned by the tuner: the identifier of the fine-tuned model and
/// the directory this run's artifacts live under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TuneOutcome {
    pub model_id: String,
    pub outdir: PathBuf,
}

/// The record persisted once per completed trial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub representation: Representation,
    pub num_train_points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_classes: Option<usize>,
    pub seed: u64,
    pub train_len: usize,
    pub test_len: usize,
    pub model_id: String,
    pub created_at: DateTime<Utc>,
    pub metrics: MetricMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<MetricMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions: Option<Vec<String>>,
}

impl RunSummary {
    pub fn new(
        params: &ExperimentParams,
        train_len: usize,
        test_len: usize,
        model_id: impl Into<String>,
        metrics: MetricMap,
    ) -> Self {
        Self {
            representation: params.representation,
            num_train_points: params.num_train_points,
            num_classes: params.num_classes,
            seed: params.seed,
            train_len,
            test_len,
            model_id: model_id.into(),
            created_at: Utc::now(),
            metrics,
            baseline: None,
            completions: None,
        }
    }

    pub fn with_baseline(mut self, baseline: MetricMap) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn with_completions(mut self, completions: Vec<String>) -> Self {
        self.completions = Some(completions);
        self
    }

    /// Convenience accessor for a scalar metric.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).and_then(|v| v.as_f64())
    }
}
