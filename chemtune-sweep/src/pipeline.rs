use chemtune_core::{
    BaselineModel, CoreError, DataTable, DatasetLoader, DatasetSpec, Evaluator, ExperimentParams,
    Extractor, FormattedDataset, Querier, Result, RunSummary, SplitPolicy, Tuner,
};
use chemtune_data::{
    capped_test_size, formatter_for, save_summary, subsample, train_test_split,
    ClassificationExtractor, RegressionExtractor,
};
use chemtune_metrics::{ClassificationEvaluator, RegressionEvaluator};
use tracing::{debug, info};

/// One full trial: load, format, split, fine-tune, query, extract, score,
/// persist. Every remote and filesystem boundary sits behind a trait so the
/// whole pipeline runs against stubs in tests.
pub struct TrialPipeline {
    loader: Box<dyn DatasetLoader>,
    test_loader: Option<Box<dyn DatasetLoader>>,
    spec: DatasetSpec,
    split: SplitPolicy,
    tuner: Box<dyn Tuner>,
    querier: Box<dyn Querier>,
    baseline: Option<Box<dyn BaselineModel>>,
    extractor: Option<Box<dyn Extractor>>,
    evaluator: Option<Box<dyn Evaluator>>,
    store_completions: bool,
}

impl TrialPipeline {
    pub fn new(
        loader: Box<dyn DatasetLoader>,
        spec: DatasetSpec,
        split: SplitPolicy,
        tuner: Box<dyn Tuner>,
        querier: Box<dyn Querier>,
    ) -> Self {
        Self {
            loader,
            test_loader: None,
            spec,
            split,
            tuner,
            querier,
            baseline: None,
            extractor: None,
            evaluator: None,
            store_completions: false,
        }
    }

    /// Separate pool the holdout test set is formatted from. Required for
    /// `SplitPolicy::Holdout`, ignored otherwise.
    pub fn with_test_loader(mut self, test_loader: Box<dyn DatasetLoader>) -> Self {
        self.test_loader = Some(test_loader);
        self
    }

    pub fn with_baseline(mut self, baseline: Box<dyn BaselineModel>) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Keep the raw completion texts in the persisted summary.
    pub fn with_stored_completions(mut self) -> Self {
        self.store_completions = true;
        self
    }

    /// Replaces the default extractor, which is chosen by `num_classes`.
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Replaces the default evaluator, which is chosen by `num_classes`.
    pub fn with_evaluator(mut self, evaluator: Box<dyn Evaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    fn prepare(&self, table: DataTable, params: &ExperimentParams) -> Result<DataTable> {
        if !self.spec.drop_missing {
            return Ok(table);
        }
        let repr_column = table.resolve_column(params.representation.column_names())?;
        let kept = table.drop_missing(&[repr_column.as_str(), self.spec.label_column.as_str()]);
        debug!(
            before = table.len(),
            after = kept.len(),
            "dropped rows with missing values"
        );
        Ok(kept)
    }

    async fn split(
        &self,
        formatted: FormattedDataset,
        params: &ExperimentParams,
    ) -> Result<(FormattedDataset, FormattedDataset)> {
        match self.split {
            SplitPolicy::Holdout => {
                let train = subsample(&formatted, params.num_train_points, params.seed)?;
                let test_loader = self.test_loader.as_ref().ok_or_else(|| {
                    CoreError::Validation("holdout split requires a test loader".into())
                })?;
                let test_table = self.prepare(test_loader.load().await?, params)?;
                let test = formatter_for(params, &self.spec).format(&test_table)?;
                Ok((train, test))
            }
            SplitPolicy::Stratified { max_test_points } => {
                let test_size =
                    capped_test_size(formatted.len(), params.num_train_points, max_test_points);
                train_test_split(
                    &formatted,
                    params.num_train_points,
                    test_size,
                    params.is_classification(),
                    params.seed,
                )
            }
        }
    }

    /// Runs the trial end to end and persists a `summary.json` into the
    /// run directory the tuner created.
    pub async fn run(&self, params: &ExperimentParams) -> Result<RunSummary> {
        let table = self.prepare(self.loader.load().await?, params)?;
        let formatted = formatter_for(params, &self.spec).format(&table)?;
        let (train, test) = self.split(formatted, params).await?;
        debug!(
            train_len = train.len(),
            test_len = test.len(),
            seed = params.seed,
            "prepared split"
        );

        let baseline = match &self.baseline {
            Some(model) => {
                let metrics = model.train_test(&train, &test).await?;
                debug!(baseline = model.name(), "scored baseline");
                Some(metrics)
            }
            None => None,
        };

        let outcome = self.tuner.fine_tune(&train).await?;
        let completions = self
            .querier
            .query(&outcome.model_id, &test, params.num_classes)
            .await?;
        if completions.len() != test.len() {
            return Err(CoreError::Internal(format!(
                "expected {} completions, got {}",
                test.len(),
                completions.len()
            )));
        }

        let predictions = self.extractor(params).extract(&completions);
        let metrics = self.evaluator(params).evaluate(&test.labels(), &predictions)?;

        let mut summary = RunSummary::new(params, train.len(), test.len(), outcome.model_id, metrics);
        if let Some(baseline) = baseline {
            summary = summary.with_baseline(baseline);
        }
        if self.store_completions {
            summary =
                summary.with_completions(completions.into_iter().map(|c| c.text).collect());
        }
        save_summary(&outcome.outdir, &summary)?;
        let metric_name = headline_metric(params);
        info!(
            representation = %params.representation,
            num_train_points = params.num_train_points,
            num_classes = ?params.num_classes,
            seed = params.seed,
            metric = metric_name,
            value = summary.metric(metric_name).unwrap_or(f64::NAN),
            outdir = %outcome.outdir.display(),
            "trial complete"
        );
        Ok(summary)
    }

    fn extractor(&self, params: &ExperimentParams) -> &dyn Extractor {
        match &self.extractor {
            Some(extractor) => extractor.as_ref(),
            None if params.is_classification() => &ClassificationExtractor,
            None => &RegressionExtractor,
        }
    }

    fn evaluator(&self, params: &ExperimentParams) -> &dyn Evaluator {
        match &self.evaluator {
            Some(evaluator) => evaluator.as_ref(),
            None if params.is_classification() => &ClassificationEvaluator,
            None => &RegressionEvaluator,
        }
    }
}

/// The metric reported in the per-trial progress line.
pub fn headline_metric(params: &ExperimentParams) -> &'static str {
    if params.is_classification() {
        "accuracy"
    } else {
        "mean_absolute_error"
    }
}
