use chemtune_core::{ExperimentParams, Result, RunSummary};
use chemtune_metrics::{aggregate, AggregatedMetric};
use tracing::{error, info};

use crate::grid::SweepGrid;
use crate::pipeline::TrialPipeline;

/// Terminal state of one grid point.
#[derive(Debug, Clone)]
pub enum TrialOutcome {
    Completed(RunSummary),
    Failed { error: String },
}

/// Everything a finished (or aborted) sweep produced, in grid order.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub trials: Vec<(ExperimentParams, TrialOutcome)>,
}

impl SweepReport {
    pub fn summaries(&self) -> Vec<&RunSummary> {
        self.trials
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                TrialOutcome::Completed(summary) => Some(summary),
                TrialOutcome::Failed { .. } => None,
            })
            .collect()
    }

    pub fn num_failed(&self) -> usize {
        self.trials
            .iter()
            .filter(|(_, outcome)| matches!(outcome, TrialOutcome::Failed { .. }))
            .count()
    }

    /// Aggregates one scalar metric over every completed trial.
    pub fn aggregate_metric(&self, name: &str) -> AggregatedMetric {
        let values: Vec<f64> = self
            .summaries()
            .iter()
            .filter_map(|summary| summary.metric(name))
            .collect();
        aggregate(&values)
    }
}

/// Walks the grid sequentially, one trial at a time.
///
/// With failure isolation on, a failed trial is logged and recorded and the
/// sweep moves on; completed trials keep their persisted summaries either
/// way. With isolation off the first failure aborts the whole sweep.
pub struct SweepDriver {
    grid: SweepGrid,
    pipeline: TrialPipeline,
    isolate_failures: bool,
}

impl SweepDriver {
    pub fn new(grid: SweepGrid, pipeline: TrialPipeline) -> Self {
        Self {
            grid,
            pipeline,
            isolate_failures: true,
        }
    }

    pub fn with_isolated_failures(mut self, isolate_failures: bool) -> Self {
        self.isolate_failures = isolate_failures;
        self
    }

    pub async fn run(&self) -> Result<SweepReport> {
        let total = self.grid.len();
        let mut report = SweepReport::default();

        for (index, params) in self.grid.points().enumerate() {
            info!(
                trial = index + 1,
                total,
                representation = %params.representation,
                num_train_points = params.num_train_points,
                num_classes = ?params.num_classes,
                seed = params.seed,
                "starting trial"
            );
            match self.pipeline.run(&params).await {
                Ok(summary) => report.trials.push((params, TrialOutcome::Completed(summary))),
                Err(err) if self.isolate_failures => {
                    error!(trial = index + 1, total, error = %err, "trial failed, continuing");
                    report.trials.push((
                        params,
                        TrialOutcome::Failed {
                            error: err.to_string(),
                        },
                    ));
                }
                Err(err) => {
                    error!(trial = index + 1, total, error = %err, "trial failed, aborting sweep");
                    return Err(err);
                }
            }
        }

        info!(
            completed = report.trials.len() - report.num_failed(),
            failed = report.num_failed(),
            total,
            "sweep finished"
        );
        Ok(report)
    }
}
