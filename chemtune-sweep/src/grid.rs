use chemtune_core::{ExperimentParams, Representation};

/// The cartesian grid a sweep walks: representation x train size x class
/// count x repeat. `class_counts` holds `None` for regression sweeps.
///
/// Seeds are derived as `seed_offset + repeat_index`, so every trial within
/// one repeat shares a seed and repeats never collide.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGrid {
    pub representations: Vec<Representation>,
    pub train_sizes: Vec<usize>,
    pub class_counts: Vec<Option<usize>>,
    pub num_repeats: usize,
    pub seed_offset: u64,
}

impl SweepGrid {
    pub fn new(representations: Vec<Representation>, train_sizes: Vec<usize>) -> Self {
        Self {
            representations,
            train_sizes,
            class_counts: vec![None],
            num_repeats: 1,
            seed_offset: 0,
        }
    }

    pub fn with_class_counts(mut self, class_counts: Vec<usize>) -> Self {
        self.class_counts = class_counts.into_iter().map(Some).collect();
        self
    }

    pub fn with_num_repeats(mut self, num_repeats: usize) -> Self {
        self.num_repeats = num_repeats;
        self
    }

    pub fn with_seed_offset(mut self, seed_offset: u64) -> Self {
        self.seed_offset = seed_offset;
        self
    }

    pub fn len(&self) -> usize {
        self.num_repeats
            * self.class_counts.len()
            * self.representations.len()
            * self.train_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily yields every grid point. Repeats are the outermost loop so a
    /// whole pass over the grid finishes before the next repeat starts.
    pub fn points(&self) -> impl Iterator<Item = ExperimentParams> + '_ {
        (0..self.num_repeats).flat_map(move |repeat| {
            self.class_counts.iter().flat_map(move |&num_classes| {
                self.representations.iter().flat_map(move |&representation| {
                    self.train_sizes.iter().map(move |&num_train_points| {
                        ExperimentParams::new(
                            representation,
                            num_train_points,
                            num_classes,
                            self.seed_offset + repeat as u64,
                        )
                    })
                })
            })
        })
    }
}
