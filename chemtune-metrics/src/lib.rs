pub mod aggregators;
pub mod classification;
pub mod regression;

pub use aggregators::*;
pub use classification::{ClassificationEvaluator, ClassificationMetrics};
pub use regression::{RegressionEvaluator, RegressionMetrics};
