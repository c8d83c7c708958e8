use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const PAIR_LEN: usize = 6;

/// Normalized currency-pair code, e.g. `EURUSD`.
///
/// Two 3-letter currency legs, uppercased on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PairCode(String);

impl PairCode {
    /// Parse and normalize a pair code to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyPair);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let valid = normalized.len() == PAIR_LEN
            && normalized.chars().all(|ch| ch.is_ascii_alphabetic());
        if !valid {
            return Err(ValidationError::InvalidPair {
                value: input.to_owned(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base currency leg, e.g. `EUR` in `EURUSD`.
    pub fn base(&self) -> &str {
        &self.0[..PAIR_LEN / 2]
    }

    /// The quote currency leg, e.g. `USD` in `EURUSD`.
    pub fn quote(&self) -> &str {
        &self.0[PAIR_LEN / 2..]
    }
}

impl Display for PairCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PairCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for PairCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PairCode> for String {
    fn from(value: PairCode) -> Self {
        value.0
    }
}
