use chemtune_core::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::str::FromStr;

// ===== Representation Tests =====

#[rstest]
#[case(Representation::Smiles, "SMILES")]
#[case(Representation::Selfies, "SELFIES")]
#[case(Representation::Inchi, "InChI")]
#[case(Representation::Name, "name")]
#[case(Representation::Tucan, "tucan")]
#[case(Representation::DeepSmiles, "deepsmiles")]
fn test_representation_serializes_to_column_spelling(
    #[case] repr: Representation,
    #[case] expected: &str,
) {
    let json = serde_json::to_value(repr).unwrap();
    assert_eq!(json, serde_json::json!(expected));
}

#[test]
fn test_representation_from_str_accepts_alternate_spellings() {
    assert_eq!(Representation::from_str("inchi").unwrap(), Representation::Inchi);
    assert_eq!(Representation::from_str("InChI").unwrap(), Representation::Inchi);
    assert_eq!(Representation::from_str("selfies").unwrap(), Representation::Selfies);
    assert_eq!(Representation::from_str("smiles").unwrap(), Representation::Smiles);
}

#[test]
fn test_representation_from_str_rejects_unknown() {
    assert!(Representation::from_str("morgan_fingerprint").is_err());
}

// ===== ExperimentParams Tests =====

#[test]
fn test_params_classification_flag() {
    let regression = ExperimentParams::new(Representation::Smiles, 50, None, 1);
    let classification = ExperimentParams::new(Representation::Smiles, 50, Some(2), 1);

    assert!(!regression.is_classification());
    assert!(classification.is_classification());
}

// ===== Label Tests =====

#[test]
fn test_label_as_f64() {
    assert_eq!(Label::Numeric(1.5).as_f64(), 1.5);
    assert_eq!(Label::Class(3).as_f64(), 3.0);
}

#[test]
fn test_label_as_class() {
    assert_eq!(Label::Class(2).as_class(), Some(2));
    assert_eq!(Label::Numeric(2.0).as_class(), None);
}

#[test]
fn test_label_serde_round_trip() {
    for label in [Label::Numeric(-3.25), Label::Class(4)] {
        let json = serde_json::to_string(&label).unwrap();
        let back: Label = serde_json::from_str(&json).unwrap();
        assert_eq!(label, back);
    }
}

// ===== RunSummary Tests =====

fn sample_summary() -> RunSummary {
    let params = ExperimentParams::new(Representation::Smiles, 50, None, 3657);
    let mut metrics = MetricMap::new();
    metrics.insert("mean_absolute_error".into(), serde_json::json!(0.42));
    RunSummary::new(&params, 50, 100, "ft:model-1", metrics)
}

#[test]
fn test_summary_echoes_parameters() {
    let summary = sample_summary();
    assert_eq!(summary.representation, Representation::Smiles);
    assert_eq!(summary.num_train_points, 50);
    assert_eq!(summary.num_classes, None);
    assert_eq!(summary.seed, 3657);
    assert_eq!(summary.metric("mean_absolute_error"), Some(0.42));
    assert_eq!(summary.metric("accuracy"), None);
}

#[test]
fn test_summary_serde_round_trip() {
    let summary = sample_summary()
        .with_baseline(MetricMap::new())
        .with_completions(vec![" 1.0@@@".into()]);
    let json = serde_json::to_string(&summary).unwrap();
    let back: RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(summary, back);
}

#[test]
fn test_summary_omits_absent_optional_fields() {
    let json = serde_json::to_value(sample_summary()).unwrap();
    let obj = json.as_object().unwrap();
    assert!(!obj.contains_key("num_classes"));
    assert!(!obj.contains_key("baseline"));
    assert!(!obj.contains_key("completions"));
    assert_eq!(obj.get("representation").unwrap(), "SMILES");
}

// ===== TuningParams Tests =====

#[test]
fn test_tuning_params_defaults() {
    let params = TuningParams::default();
    assert_eq!(params.n_epochs, 8);
    assert_eq!(params.learning_rate_multiplier, 0.02);
    assert_eq!(params.base_model, None);
    assert!(!params.experiment_tracking);
}

#[test]
fn test_tuning_params_base_model_builder() {
    let params = TuningParams::default().with_base_model("gpt-3.5-turbo");
    assert_eq!(params.base_model.as_deref(), Some("gpt-3.5-turbo"));
}
