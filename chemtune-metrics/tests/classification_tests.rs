use approx::assert_relative_eq;
use chemtune_core::Label;
use chemtune_metrics::classification;

fn classes(values: &[usize]) -> Vec<Label> {
    values.iter().map(|&c| Label::Class(c)).collect()
}

fn predictions(values: &[Option<usize>]) -> Vec<Option<Label>> {
    values.iter().map(|v| v.map(Label::Class)).collect()
}

#[test]
fn test_perfect_binary_predictions() {
    let truth = classes(&[0, 0, 1, 1]);
    let preds = predictions(&[Some(0), Some(0), Some(1), Some(1)]);
    let metrics = classification::compute(&truth, &preds).unwrap();

    assert_eq!(metrics.accuracy, 1.0);
    assert_eq!(metrics.f1_macro, 1.0);
    assert_eq!(metrics.f1_micro, 1.0);
    assert_eq!(metrics.cohen_kappa, 1.0);
    assert_eq!(metrics.support, vec![2, 2]);
}

#[test]
fn test_known_confusion_matrix_statistics() {
    let truth = classes(&[0, 0, 1, 1]);
    let preds = predictions(&[Some(0), Some(1), Some(1), Some(1)]);
    let metrics = classification::compute(&truth, &preds).unwrap();

    assert_relative_eq!(metrics.accuracy, 0.75);
    assert_relative_eq!(metrics.f1_macro, (2.0 / 3.0 + 0.8) / 2.0);
    assert_relative_eq!(metrics.f1_micro, 0.75);
    assert_relative_eq!(metrics.cohen_kappa, 0.5);
}

#[test]
fn test_failed_extractions_count_as_wrong_for_accuracy() {
    let truth = classes(&[0, 1, 1, 1]);
    let preds = predictions(&[Some(0), None, Some(1), Some(1)]);
    let metrics = classification::compute(&truth, &preds).unwrap();

    assert_eq!(metrics.num_failed_extractions, 1);
    assert_relative_eq!(metrics.accuracy, 0.75);
    // Micro F1 only sees the extractable pairs, all of which are correct.
    assert_relative_eq!(metrics.f1_micro, 1.0);
}

#[test]
fn test_predicted_class_outside_truth_extends_the_matrix() {
    let truth = classes(&[0, 0, 1]);
    let preds = predictions(&[Some(0), Some(4), Some(1)]);
    let metrics = classification::compute(&truth, &preds).unwrap();

    assert_relative_eq!(metrics.accuracy, 2.0 / 3.0);
    // Class 4 has zero support in the truth labels.
    assert_eq!(metrics.support, vec![2, 1, 0]);
}

#[test]
fn test_numeric_truth_labels_are_rejected() {
    let truth = vec![Label::Numeric(0.5)];
    let preds = predictions(&[Some(0)]);
    assert!(classification::compute(&truth, &preds).is_err());
}

#[test]
fn test_empty_test_set_is_an_error() {
    assert!(classification::compute(&[], &[]).is_err());
}
