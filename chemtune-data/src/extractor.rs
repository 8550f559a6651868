use chemtune_core::{Completion, Extractor, Label};

use crate::formatter::COMPLETION_SUFFIX;

fn payload(text: &str) -> &str {
    text.split(COMPLETION_SUFFIX).next().unwrap_or("").trim()
}

/// Parses regression completions back into numeric predictions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionExtractor;

impl Extractor for RegressionExtractor {
    fn extract(&self, completions: &[Completion]) -> Vec<Option<Label>> {
        completions
            .iter()
            .map(|c| payload(&c.text).parse::<f64>().ok().map(Label::Numeric))
            .collect()
    }
}

/// Parses classification completions back into class predictions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationExtractor;

impl Extractor for ClassificationExtractor {
    fn extract(&self, completions: &[Completion]) -> Vec<Option<Label>> {
        completions
            .iter()
            .map(|c| payload(&c.text).parse::<usize>().ok().map(Label::Class))
            .collect()
    }
}
