//! Sweep orchestration: the grid of experiment parameters, the per-trial
//! pipeline, reference baselines, and the sequential driver that walks the
//! grid.

pub mod baselines;
pub mod driver;
pub mod grid;
pub mod pipeline;

pub use baselines::{MajorityClass, MeanRegressor};
pub use driver::{SweepDriver, SweepReport, TrialOutcome};
pub use grid::SweepGrid;
pub use pipeline::{headline_metric, TrialPipeline};
