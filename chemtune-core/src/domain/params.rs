use serde::{Deserialize, Serialize};

use super::representation::Representation;

/// One point of the sweep grid. Immutable for the duration of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExperimentParams {
    pub representation: Representation,
    pub num_train_points: usize,
    /// `None` means regression; `Some(k)` means k-class classification.
    pub num_classes: Option<usize>,
    pub seed: u64,
}

impl ExperimentParams {
    pub fn new(
        representation: Representation,
        num_train_points: usize,
        num_classes: Option<usize>,
        seed: u64,
    ) -> Self {
        Self {
            representation,
            num_train_points,
            num_classes,
            seed,
        }
    }

    pub fn is_classification(&self) -> bool {
        self.num_classes.is_some()
    }
}
