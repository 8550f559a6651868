use chemtune_core::*;
use chemtune_data::*;
use pretty_assertions::assert_eq;
use std::io::Write;

// ===== Summary round-trip Tests =====

fn sample_summary() -> RunSummary {
    let params = ExperimentParams::new(Representation::Selfies, 100, Some(5), 6676);
    let mut metrics = MetricMap::new();
    metrics.insert("accuracy".into(), serde_json::json!(0.84));
    metrics.insert("f1_macro".into(), serde_json::json!(0.79));
    let mut baseline = MetricMap::new();
    baseline.insert("accuracy".into(), serde_json::json!(0.2));
    RunSummary::new(&params, 100, 250, "ft:gap-model", metrics)
        .with_baseline(baseline)
        .with_completions(vec![" 0@@@".into(), " 3@@@".into()])
}

#[test]
fn test_summary_round_trips_by_value() {
    let dir = tempfile::tempdir().unwrap();
    let summary = sample_summary();

    save_summary(dir.path(), &summary).unwrap();
    let loaded = load_summary(dir.path()).unwrap();
    assert_eq!(summary, loaded);
}

#[test]
fn test_save_summary_creates_missing_outdir() {
    let dir = tempfile::tempdir().unwrap();
    let outdir = dir.path().join("runs").join("2024-01-01_abcdef");
    save_summary(&outdir, &sample_summary()).unwrap();
    assert!(outdir.join(SUMMARY_FILE).exists());
}

#[test]
fn test_load_summary_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_summary(dir.path()).is_err());
}

// ===== CsvLoader Tests =====

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_csv_loader_infers_cell_types() {
    let file = write_csv("SMILES,gap,note\nCCO,1.5,ok\nCCN,,missing\nCO,2,\n");
    let table = CsvLoader::new(file.path()).load().await.unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(cell_f64(table.get(0, "gap")), Some(1.5));
    assert_eq!(table.get(1, "gap"), Some(&serde_json::Value::Null));
    assert_eq!(cell_f64(table.get(2, "gap")), Some(2.0));
    assert_eq!(cell_str(table.get(0, "note")).as_deref(), Some("ok"));
    assert_eq!(cell_str(table.get(0, "SMILES")).as_deref(), Some("CCO"));
}

#[tokio::test]
async fn test_csv_loader_missing_file_is_a_data_error() {
    let result = CsvLoader::new("/definitely/not/here.csv").load().await;
    assert!(matches!(result, Err(CoreError::Data(_))));
}

#[tokio::test]
async fn test_csv_loader_feeds_drop_missing() {
    let file = write_csv("tucan,deepsmiles,gap\nt1,d1,1.0\nt2,,2.0\n,d3,3.0\n");
    let table = CsvLoader::new(file.path()).load().await.unwrap();

    assert_eq!(table.drop_missing(&["tucan", "gap"]).len(), 2);
    assert_eq!(table.drop_missing(&["deepsmiles", "gap"]).len(), 2);
    assert_eq!(table.drop_missing(&["tucan", "deepsmiles", "gap"]).len(), 1);
}

// ===== StaticLoader Tests =====

#[tokio::test]
async fn test_static_loader_returns_its_table() {
    let mut row = serde_json::Map::new();
    row.insert("SMILES".into(), serde_json::json!("CCO"));
    let table = DataTable::new(vec![row]);

    let loaded = StaticLoader::new(table.clone()).load().await.unwrap();
    assert_eq!(loaded, table);
}
