use anyhow::{anyhow, Result};
use chemtune_data::CsvLoader;
use chemtune_openai::{OpenAiConfig, OpenAiQuerier, OpenAiTuner};
use chemtune_sweep::{MajorityClass, MeanRegressor, SweepDriver, TrialPipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod presets;

use presets::Baseline;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    // Initialize tracing; RUST_LOG wins over the configured level.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("chemtune={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let preset = presets::preset(&config.family).ok_or_else(|| {
        anyhow!(
            "unknown sweep family {:?}, expected solubility, photoswitch or qmugs",
            config.family
        )
    })?;
    tracing::info!(
        family = preset.name,
        trials = preset.grid.len(),
        "starting sweep"
    );

    let openai = OpenAiConfig::from_env()?.with_runs_dir(config.runs_dir.clone());
    let tuner = OpenAiTuner::new(openai.clone(), preset.tuning.clone())?;
    let querier = OpenAiQuerier::new(openai)?;

    let mut pipeline = TrialPipeline::new(
        Box::new(CsvLoader::new(config.data_dir.join(preset.train_file))),
        preset.dataset.clone(),
        preset.split,
        Box::new(tuner),
        Box::new(querier),
    );
    if let Some(test_file) = preset.test_file {
        pipeline = pipeline.with_test_loader(Box::new(CsvLoader::new(
            config.data_dir.join(test_file),
        )));
    }
    pipeline = match preset.baseline {
        Baseline::Mean => pipeline.with_baseline(Box::new(MeanRegressor)),
        Baseline::Majority => pipeline.with_baseline(Box::new(MajorityClass)),
        Baseline::None => pipeline,
    };
    if preset.store_completions {
        pipeline = pipeline.with_stored_completions();
    }

    let driver = SweepDriver::new(preset.grid.clone(), pipeline)
        .with_isolated_failures(preset.isolate_failures);
    let report = driver.run().await?;

    let aggregated = report.aggregate_metric(preset.primary_metric);
    tracing::info!(
        metric = preset.primary_metric,
        mean = aggregated.mean,
        std_dev = aggregated.std_dev,
        completed = aggregated.count,
        failed = report.num_failed(),
        "sweep summary"
    );

    Ok(())
}
