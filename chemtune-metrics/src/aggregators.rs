use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Summary of one metric across repeated trials of the same grid cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatedMetric {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// Student-t confidence interval for the mean; absent below two samples.
    pub confidence_interval: Option<(f64, f64)>,
}

pub fn aggregate(values: &[f64]) -> AggregatedMetric {
    aggregate_with_confidence(values, 0.95)
}

pub fn aggregate_with_confidence(values: &[f64], confidence: f64) -> AggregatedMetric {
    if values.is_empty() {
        return AggregatedMetric {
            mean: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            count: 0,
            confidence_interval: None,
        };
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if values.len() < 2 {
        return AggregatedMetric {
            mean,
            std_dev: 0.0,
            min,
            max,
            count: values.len(),
            confidence_interval: None,
        };
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    let confidence_interval = StudentsT::new(0.0, 1.0, n - 1.0).ok().map(|t_dist| {
        let t_value = t_dist.inverse_cdf((1.0 + confidence) / 2.0);
        let margin = t_value * std_dev / n.sqrt();
        (mean - margin, mean + margin)
    });

    AggregatedMetric {
        mean,
        std_dev,
        min,
        max,
        count: values.len(),
        confidence_interval,
    }
}
