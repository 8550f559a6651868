use serde::{Deserialize, Serialize};

/// A structured label or prediction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Label {
    Numeric(f64),
    Class(usize),
}

impl Label {
    pub fn as_f64(&self) -> f64 {
        match self {
            Label::Numeric(v) => *v,
            Label::Class(c) => *c as f64,
        }
    }

    pub fn as_class(&self) -> Option<usize> {
        match self {
            Label::Class(c) => Some(*c),
            Label::Numeric(_) => None,
        }
    }
}

/// One (text, label) pair produced by a formatter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedSample {
    pub prompt: String,
    pub completion: String,
    pub label: Label,
}

/// A formatted table ready for tuning or querying.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedDataset {
    pub property: String,
    pub samples: Vec<FormattedSample>,
}

impl FormattedDataset {
    pub fn new(property: impl Into<String>, samples: Vec<FormattedSample>) -> Self {
        Self {
            property: property.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.samples.iter().map(|s| s.label).collect()
    }

    pub fn select(&self, indices: &[usize]) -> FormattedDataset {
        let samples = indices
            .iter()
            .filter_map(|&i| self.samples.get(i).cloned())
            .collect();
        FormattedDataset {
            property: self.property.clone(),
            samples,
        }
    }
}

/// Raw textual completion returned by the querier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Completion {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_logprobs: Option<serde_json::Value>,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            token_logprobs: None,
        }
    }
}
