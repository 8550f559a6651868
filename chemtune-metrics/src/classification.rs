use std::collections::BTreeSet;

use chemtune_core::{CoreError, Evaluator, Label, MetricMap, Result};
use serde::{Deserialize, Serialize};

/// Classification statistics. Failed extractions count against accuracy but
/// are excluded from the confusion matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub f1_macro: f64,
    pub f1_micro: f64,
    pub cohen_kappa: f64,
    pub support: Vec<usize>,
    pub num_failed_extractions: usize,
}

impl ClassificationMetrics {
    pub fn to_map(&self) -> MetricMap {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => MetricMap::new(),
        }
    }
}

pub fn compute(truth: &[Label], predictions: &[Option<Label>]) -> Result<ClassificationMetrics> {
    if truth.len() != predictions.len() {
        return Err(CoreError::Validation(format!(
            "{} labels but {} predictions",
            truth.len(),
            predictions.len()
        )));
    }
    if truth.is_empty() {
        return Err(CoreError::Validation("empty test set".into()));
    }

    let truth_classes: Vec<usize> = truth
        .iter()
        .map(|l| {
            l.as_class()
                .ok_or_else(|| CoreError::Validation("classification needs class labels".into()))
        })
        .collect::<Result<_>>()?;

    let mut classes: BTreeSet<usize> = truth_classes.iter().copied().collect();
    let extracted: Vec<(usize, usize)> = truth_classes
        .iter()
        .zip(predictions.iter())
        .filter_map(|(t, p)| p.and_then(|p| p.as_class()).map(|p| (*t, p)))
        .collect();
    classes.extend(extracted.iter().map(|(_, p)| *p));
    let num_failed_extractions = truth.len() - extracted.len();

    let class_list: Vec<usize> = classes.into_iter().collect();
    let k = class_list.len();
    // class_list holds every class seen in truth or predictions, so the
    // lookup cannot miss.
    let index_of = |class: usize| class_list.iter().position(|&c| c == class).unwrap_or(0);

    // Confusion matrix over extractable pairs.
    let mut matrix = vec![vec![0usize; k]; k];
    for (t, p) in &extracted {
        matrix[index_of(*t)][index_of(*p)] += 1;
    }

    let correct: usize = (0..k).map(|i| matrix[i][i]).sum();
    let accuracy = correct as f64 / truth.len() as f64;

    let mut f1_sum = 0.0;
    for i in 0..k {
        let tp = matrix[i][i] as f64;
        let fp: f64 = (0..k).filter(|&j| j != i).map(|j| matrix[j][i] as f64).sum();
        let fn_: f64 = (0..k).filter(|&j| j != i).map(|j| matrix[i][j] as f64).sum();
        let denom = 2.0 * tp + fp + fn_;
        if denom > 0.0 {
            f1_sum += 2.0 * tp / denom;
        }
    }
    let f1_macro = f1_sum / k as f64;

    // Micro F1 over the extractable pairs equals their accuracy.
    let f1_micro = if extracted.is_empty() {
        0.0
    } else {
        correct as f64 / extracted.len() as f64
    };

    let cohen_kappa = kappa(&matrix, extracted.len());

    let support = class_list
        .iter()
        .map(|&c| truth_classes.iter().filter(|&&t| t == c).count())
        .collect();

    Ok(ClassificationMetrics {
        accuracy,
        f1_macro,
        f1_micro,
        cohen_kappa,
        support,
        num_failed_extractions,
    })
}

fn kappa(matrix: &[Vec<usize>], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let k = matrix.len();
    let n = total as f64;
    let observed: f64 = (0..k).map(|i| matrix[i][i] as f64).sum::<f64>() / n;
    let expected: f64 = (0..k)
        .map(|i| {
            let row: f64 = matrix[i].iter().map(|&c| c as f64).sum();
            let col: f64 = (0..k).map(|j| matrix[j][i] as f64).sum();
            (row / n) * (col / n)
        })
        .sum();
    if (1.0 - expected).abs() < f64::EPSILON {
        return 0.0;
    }
    (observed - expected) / (1.0 - expected)
}

/// Default classification evaluator behind the `Evaluator` seam.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationEvaluator;

impl Evaluator for ClassificationEvaluator {
    fn evaluate(&self, truth: &[Label], predictions: &[Option<Label>]) -> Result<MetricMap> {
        compute(truth, predictions).map(|m| m.to_map())
    }
}
