use std::time::Duration;

use chemtune_core::{
    CoreError, FormattedDataset, FormattedSample, Label, Tuner, TuningParams,
};
use chemtune_openai::{OpenAiConfig, OpenAiTuner};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_dataset() -> FormattedDataset {
    FormattedDataset::new(
        "solubility",
        vec![
            FormattedSample {
                prompt: "What is the solubility of CCO?###".into(),
                completion: " 0.4@@@".into(),
                label: Label::Numeric(0.4),
            },
            FormattedSample {
                prompt: "What is the solubility of CCN?###".into(),
                completion: " -1.2@@@".into(),
                label: Label::Numeric(-1.2),
            },
        ],
    )
}

fn test_config(server: &MockServer, runs_dir: &TempDir) -> OpenAiConfig {
    OpenAiConfig::new("sk-test")
        .with_base_url(server.uri())
        .with_runs_dir(runs_dir.path())
        .with_poll_interval(Duration::from_millis(5))
}

#[tokio::test]
async fn test_fine_tune_happy_path() {
    let server = MockServer::start().await;
    let runs_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-abc"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fine_tuning/jobs"))
        .and(body_partial_json(json!({
            "training_file": "file-abc",
            "model": "babbage-002",
            "hyperparameters": {"n_epochs": 8, "learning_rate_multiplier": 0.02}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "ftjob-1", "status": "queued"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fine_tuning/jobs/ftjob-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "ftjob-1", "status": "running"})),
        )
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fine_tuning/jobs/ftjob-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ftjob-1",
            "status": "succeeded",
            "fine_tuned_model": "ft:babbage-002:chem:1"
        })))
        .mount(&server)
        .await;

    let tuner =
        OpenAiTuner::new(test_config(&server, &runs_dir), TuningParams::default()).unwrap();
    let outcome = tuner.fine_tune(&sample_dataset()).await.unwrap();

    assert_eq!(outcome.model_id, "ft:babbage-002:chem:1");
    assert!(outcome.outdir.starts_with(runs_dir.path()));

    let jsonl = std::fs::read_to_string(outcome.outdir.join("train.jsonl")).unwrap();
    let lines: Vec<&str> = jsonl.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["prompt"], "What is the solubility of CCO?###");
    assert_eq!(first["completion"], " 0.4@@@");
}

#[tokio::test]
async fn test_failed_job_is_an_error() {
    let server = MockServer::start().await;
    let runs_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-abc"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fine_tuning/jobs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "ftjob-2", "status": "queued"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/fine_tuning/jobs/ftjob-2$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "ftjob-2", "status": "failed"})),
        )
        .mount(&server)
        .await;

    let tuner =
        OpenAiTuner::new(test_config(&server, &runs_dir), TuningParams::default()).unwrap();
    let err = tuner.fine_tune(&sample_dataset()).await.unwrap_err();
    assert!(matches!(err, CoreError::RemoteService(_)));
}

#[tokio::test]
async fn test_base_model_override() {
    let server = MockServer::start().await;
    let runs_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-xyz"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fine_tuning/jobs"))
        .and(body_partial_json(json!({"model": "gpt-3.5-turbo"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ftjob-3",
            "status": "succeeded",
            "fine_tuned_model": "ft:gpt-3.5-turbo:chem:1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fine_tuning/jobs/ftjob-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ftjob-3",
            "status": "succeeded",
            "fine_tuned_model": "ft:gpt-3.5-turbo:chem:1"
        })))
        .mount(&server)
        .await;

    let params = TuningParams::default().with_base_model("gpt-3.5-turbo");
    let tuner = OpenAiTuner::new(test_config(&server, &runs_dir), params).unwrap();
    let outcome = tuner.fine_tune(&sample_dataset()).await.unwrap();
    assert_eq!(outcome.model_id, "ft:gpt-3.5-turbo:chem:1");
}

#[tokio::test]
async fn test_empty_training_set_is_rejected() {
    let server = MockServer::start().await;
    let runs_dir = TempDir::new().unwrap();

    let tuner =
        OpenAiTuner::new(test_config(&server, &runs_dir), TuningParams::default()).unwrap();
    let empty = FormattedDataset::new("solubility", vec![]);
    let err = tuner.fine_tune(&empty).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}
