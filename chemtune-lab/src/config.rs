use std::path::PathBuf;

use anyhow::Result;
use ::config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Which preset sweep to run: solubility, photoswitch or qmugs.
    pub family: String,
    pub data_dir: PathBuf,
    pub runs_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = ConfigLoader::builder()
            .set_default("family", "solubility")?
            .set_default("data_dir", "data")?
            .set_default("runs_dir", "runs")?
            .set_default("log_level", "info")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("CHEMTUNE"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
