#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chemtune_core::{
    Completion, CoreError, DataTable, FormattedDataset, Querier, Result, TuneOutcome, Tuner,
};
use serde_json::{Map, Value};

/// Synthetic solubility-style table: SMILES strings with a linear label.
pub fn make_table(rows: usize) -> DataTable {
    let table: Vec<Map<String, Value>> = (0..rows)
        .map(|i| {
            let mut row = Map::new();
            row.insert("SMILES".into(), Value::String(format!("C{}O", "C".repeat(i % 7))));
            row.insert(
                "measured log(solubility:mol/L)".into(),
                Value::Number(serde_json::Number::from_f64(i as f64 * 0.1).unwrap()),
            );
            row
        })
        .collect();
    DataTable::new(table)
}

/// Two-class table: label column already holds a numeric value whose median
/// split gives balanced classes.
pub fn make_binary_table(rows: usize) -> DataTable {
    make_table(rows)
}

/// Succeeds every call, handing out a fresh numbered run directory.
pub struct StubTuner {
    runs_dir: PathBuf,
    counter: AtomicUsize,
}

impl StubTuner {
    pub fn new(runs_dir: impl Into<PathBuf>) -> Self {
        Self {
            runs_dir: runs_dir.into(),
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Tuner for StubTuner {
    async fn fine_tune(&self, _train: &FormattedDataset) -> Result<TuneOutcome> {
        let run = self.counter.fetch_add(1, Ordering::SeqCst);
        let outdir = self.runs_dir.join(format!("run_{run}"));
        std::fs::create_dir_all(&outdir)?;
        Ok(TuneOutcome {
            model_id: format!("ft:stub:{run}"),
            outdir,
        })
    }
}

/// Fails exactly when the training set has `fail_on_len` rows, otherwise
/// behaves like `StubTuner`.
pub struct FlakyTuner {
    inner: StubTuner,
    fail_on_len: usize,
}

impl FlakyTuner {
    pub fn new(runs_dir: impl Into<PathBuf>, fail_on_len: usize) -> Self {
        Self {
            inner: StubTuner::new(runs_dir),
            fail_on_len,
        }
    }
}

#[async_trait]
impl Tuner for FlakyTuner {
    async fn fine_tune(&self, train: &FormattedDataset) -> Result<TuneOutcome> {
        if train.len() == self.fail_on_len {
            return Err(CoreError::RemoteService("tuning service unavailable".into()));
        }
        self.inner.fine_tune(train).await
    }
}

/// Answers every prompt with the true label shifted by a fixed offset, so
/// regression error metrics are known in closed form.
pub struct OffsetQuerier {
    pub offset: f64,
}

#[async_trait]
impl Querier for OffsetQuerier {
    async fn query(
        &self,
        _model_id: &str,
        test: &FormattedDataset,
        _logprobs: Option<usize>,
    ) -> Result<Vec<Completion>> {
        Ok(test
            .samples
            .iter()
            .map(|sample| Completion::text(format!(" {:.4}@@@", sample.label.as_f64() + self.offset)))
            .collect())
    }
}

/// Echoes the true class back and records the `logprobs` argument it saw.
pub struct EchoClassQuerier {
    pub seen_logprobs: Arc<Mutex<Vec<Option<usize>>>>,
}

impl EchoClassQuerier {
    pub fn new() -> (Self, Arc<Mutex<Vec<Option<usize>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                seen_logprobs: Arc::clone(&seen),
            },
            seen,
        )
    }
}

#[async_trait]
impl Querier for EchoClassQuerier {
    async fn query(
        &self,
        _model_id: &str,
        test: &FormattedDataset,
        logprobs: Option<usize>,
    ) -> Result<Vec<Completion>> {
        self.seen_logprobs.lock().unwrap().push(logprobs);
        Ok(test
            .samples
            .iter()
            .map(|sample| {
                let class = sample.label.as_class().unwrap_or(0);
                Completion::text(format!(" {class}@@@"))
            })
            .collect())
    }
}
