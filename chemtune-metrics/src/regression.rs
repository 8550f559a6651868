use chemtune_core::{CoreError, Evaluator, Label, MetricMap, Result};
use serde::{Deserialize, Serialize};

/// Error statistics for a regression run, computed over the pairs where a
/// prediction could be extracted from the completion text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegressionMetrics {
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    pub r2: f64,
    pub max_error: f64,
    pub num_failed_extractions: usize,
}

impl RegressionMetrics {
    pub fn to_map(&self) -> MetricMap {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => MetricMap::new(),
        }
    }
}

pub fn compute(truth: &[Label], predictions: &[Option<Label>]) -> Result<RegressionMetrics> {
    if truth.len() != predictions.len() {
        return Err(CoreError::Validation(format!(
            "{} labels but {} predictions",
            truth.len(),
            predictions.len()
        )));
    }

    let pairs: Vec<(f64, f64)> = truth
        .iter()
        .zip(predictions.iter())
        .filter_map(|(t, p)| p.map(|p| (t.as_f64(), p.as_f64())))
        .collect();
    let num_failed_extractions = truth.len() - pairs.len();

    if pairs.is_empty() {
        return Err(CoreError::Extraction(
            "no predictions could be extracted".into(),
        ));
    }

    let n = pairs.len() as f64;
    let mean_absolute_error = pairs.iter().map(|(t, p)| (t - p).abs()).sum::<f64>() / n;
    let mean_squared_error = pairs.iter().map(|(t, p)| (t - p).powi(2)).sum::<f64>() / n;
    let max_error = pairs
        .iter()
        .map(|(t, p)| (t - p).abs())
        .fold(0.0, f64::max);

    let truth_mean = pairs.iter().map(|(t, _)| t).sum::<f64>() / n;
    let ss_tot: f64 = pairs.iter().map(|(t, _)| (t - truth_mean).powi(2)).sum();
    let ss_res: f64 = pairs.iter().map(|(t, p)| (t - p).powi(2)).sum();
    let r2 = if ss_tot == 0.0 {
        // Constant truth: perfect only if residuals vanish.
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(RegressionMetrics {
        mean_absolute_error,
        mean_squared_error,
        root_mean_squared_error: mean_squared_error.sqrt(),
        r2,
        max_error,
        num_failed_extractions,
    })
}

/// Default regression evaluator behind the `Evaluator` seam.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionEvaluator;

impl Evaluator for RegressionEvaluator {
    fn evaluate(&self, truth: &[Label], predictions: &[Option<Label>]) -> Result<MetricMap> {
        compute(truth, predictions).map(|m| m.to_map())
    }
}
