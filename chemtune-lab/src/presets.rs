use chemtune_core::{DatasetSpec, Representation, SplitPolicy, TuningParams};
use chemtune_sweep::SweepGrid;

/// Which reference predictor runs alongside the fine-tuned model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    None,
    Mean,
    Majority,
}

/// A fully described sweep: grid, dataset wiring and execution policy.
#[derive(Debug, Clone)]
pub struct SweepPreset {
    pub name: &'static str,
    pub grid: SweepGrid,
    pub dataset: DatasetSpec,
    pub split: SplitPolicy,
    pub tuning: TuningParams,
    pub train_file: &'static str,
    pub test_file: Option<&'static str>,
    pub baseline: Baseline,
    pub isolate_failures: bool,
    pub store_completions: bool,
    /// Metric reported in the end-of-sweep aggregate line.
    pub primary_metric: &'static str,
}

pub fn preset(name: &str) -> Option<SweepPreset> {
    match name {
        "solubility" => Some(solubility()),
        "photoswitch" => Some(photoswitch()),
        "qmugs" => Some(qmugs()),
        _ => None,
    }
}

/// ESOL aqueous solubility regression against a fixed holdout test file.
/// Failures are not isolated here: a dead tuning service aborts the sweep
/// rather than burning through the remaining grid.
pub fn solubility() -> SweepPreset {
    SweepPreset {
        name: "solubility",
        grid: SweepGrid::new(
            vec![
                Representation::Smiles,
                Representation::Selfies,
                Representation::Inchi,
            ],
            vec![10, 20, 50, 100, 200, 500],
        )
        .with_num_repeats(10)
        .with_seed_offset(3657),
        dataset: DatasetSpec::new("solubility", "measured log(solubility:mol/L)"),
        split: SplitPolicy::Holdout,
        tuning: TuningParams::default(),
        train_file: "esol_train.csv",
        test_file: Some("esol_test.csv"),
        baseline: Baseline::Mean,
        isolate_failures: false,
        store_completions: false,
        primary_metric: "mean_absolute_error",
    }
}

/// Photoswitch transition wavelength, binned into 2 or 5 classes. Raw
/// completions are kept in the summary for later inspection.
pub fn photoswitch() -> SweepPreset {
    SweepPreset {
        name: "photoswitch",
        grid: SweepGrid::new(
            vec![
                Representation::Name,
                Representation::Smiles,
                Representation::Inchi,
                Representation::Selfies,
            ],
            vec![10, 20, 50, 100, 200],
        )
        .with_class_counts(vec![2, 5])
        .with_num_repeats(3)
        .with_seed_offset(54),
        dataset: DatasetSpec::new("transition wavelength", "E isomer pi-pi* wavelength in nm"),
        split: SplitPolicy::Stratified {
            max_test_points: 100,
        },
        tuning: TuningParams::default().with_base_model("gpt-3.5-turbo"),
        train_file: "photoswitches.csv",
        test_file: None,
        baseline: Baseline::Majority,
        isolate_failures: true,
        store_completions: true,
        primary_metric: "accuracy",
    }
}

/// QMugs HOMO-LUMO gap classification. The raw table has gaps, so rows
/// with missing values are dropped up front, and the raw completions are
/// kept for later inspection.
pub fn qmugs() -> SweepPreset {
    SweepPreset {
        name: "qmugs",
        grid: SweepGrid::new(
            vec![Representation::Tucan, Representation::DeepSmiles],
            vec![10, 50, 100, 200, 500, 1000, 5000],
        )
        .with_class_counts(vec![2, 5])
        .with_num_repeats(10)
        .with_seed_offset(6676),
        dataset: DatasetSpec::new("HOMO-LUMO gap", "DFT_HOMO_LUMO_GAP_mean_ev")
            .with_drop_missing(),
        split: SplitPolicy::Stratified {
            max_test_points: 250,
        },
        tuning: TuningParams::default(),
        train_file: "qmugs.csv",
        test_file: None,
        baseline: Baseline::Majority,
        isolate_failures: true,
        store_completions: true,
        primary_metric: "accuracy",
    }
}
