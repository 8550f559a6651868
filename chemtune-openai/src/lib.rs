//! Client for the remote fine-tuning and completion service.
//!
//! This crate is the only network boundary in the workspace: the tuner
//! uploads a formatted training table and blocks until the remote job
//! reaches a terminal state, the querier runs the held-out prompts against
//! the tuned model.

pub mod client;
pub mod config;
pub mod error;
pub mod querier;
pub mod tuner;

pub use client::HttpClient;
pub use config::OpenAiConfig;
pub use error::{OpenAiError, OpenAiResult};
pub use querier::OpenAiQuerier;
pub use tuner::OpenAiTuner;
