use async_trait::async_trait;
use chemtune_core::{BaselineModel, CoreError, FormattedDataset, Label, MetricMap, Result};
use chemtune_metrics::{classification, regression};

/// Predicts the training mean for every test point. The floor any
/// fine-tuned regressor has to beat.
pub struct MeanRegressor;

#[async_trait]
impl BaselineModel for MeanRegressor {
    fn name(&self) -> &str {
        "mean_regressor"
    }

    async fn train_test(
        &self,
        train: &FormattedDataset,
        test: &FormattedDataset,
    ) -> Result<MetricMap> {
        if train.is_empty() {
            return Err(CoreError::Validation(
                "mean baseline needs a non-empty training set".into(),
            ));
        }
        let mean = train
            .labels()
            .iter()
            .map(Label::as_f64)
            .sum::<f64>()
            / train.len() as f64;
        let predictions = vec![Some(Label::Numeric(mean)); test.len()];
        Ok(regression::compute(&test.labels(), &predictions)?.to_map())
    }
}

/// Predicts the most common training class for every test point.
pub struct MajorityClass;

#[async_trait]
impl BaselineModel for MajorityClass {
    fn name(&self) -> &str {
        "majority_class"
    }

    async fn train_test(
        &self,
        train: &FormattedDataset,
        test: &FormattedDataset,
    ) -> Result<MetricMap> {
        let mut counts = std::collections::BTreeMap::new();
        for label in train.labels() {
            let class = label.as_class().ok_or_else(|| {
                CoreError::Validation("majority baseline needs class labels".into())
            })?;
            *counts.entry(class).or_insert(0usize) += 1;
        }
        let majority = counts
            .into_iter()
            .max_by_key(|&(_, count)| count)
            .map(|(class, _)| class)
            .ok_or_else(|| {
                CoreError::Validation("majority baseline needs a non-empty training set".into())
            })?;
        let predictions = vec![Some(Label::Class(majority)); test.len()];
        Ok(classification::compute(&test.labels(), &predictions)?.to_map())
    }
}
