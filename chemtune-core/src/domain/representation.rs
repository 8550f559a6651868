use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Textual encoding of a molecule used as model input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Representation {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "SMILES")]
    Smiles,
    #[serde(rename = "SELFIES")]
    Selfies,
    #[serde(rename = "InChI")]
    Inchi,
    #[serde(rename = "tucan")]
    Tucan,
    #[serde(rename = "deepsmiles")]
    DeepSmiles,
}

impl Representation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Name => "name",
            Representation::Smiles => "SMILES",
            Representation::Selfies => "SELFIES",
            Representation::Inchi => "InChI",
            Representation::Tucan => "tucan",
            Representation::DeepSmiles => "deepsmiles",
        }
    }

    /// Column spellings this representation appears under across the
    /// supported datasets, canonical spelling first.
    pub fn column_names(&self) -> &'static [&'static str] {
        match self {
            Representation::Name => &["name", "Name"],
            Representation::Smiles => &["SMILES", "smiles"],
            Representation::Selfies => &["SELFIES", "selfies"],
            Representation::Inchi => &["InChI", "inchi"],
            Representation::Tucan => &["tucan"],
            Representation::DeepSmiles => &["deepsmiles"],
        }
    }

    pub fn all() -> &'static [Representation] {
        &[
            Representation::Name,
            Representation::Smiles,
            Representation::Selfies,
            Representation::Inchi,
            Representation::Tucan,
            Representation::DeepSmiles,
        ]
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Representation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for repr in Representation::all() {
            if repr
                .column_names()
                .iter()
                .any(|name| name.eq_ignore_ascii_case(s))
            {
                return Ok(*repr);
            }
        }
        Err(CoreError::Validation(format!(
            "unknown representation: {}",
            s
        )))
    }
}
