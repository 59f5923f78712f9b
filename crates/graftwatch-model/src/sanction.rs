use crate::ids::ParseError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The three public sanction registries the pipeline consolidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SanctionKind {
    Ceis,
    Cnep,
    Cepim,
}

impl SanctionKind {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "CEIS" => Ok(Self::Ceis),
            "CNEP" => Ok(Self::Cnep),
            "CEPIM" => Ok(Self::Cepim),
            other => Err(ParseError::InvalidId(format!(
                "unknown sanction kind: {other}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ceis => "CEIS",
            Self::Cnep => "CNEP",
            Self::Cepim => "CEPIM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sanction {
    pub kind: SanctionKind,
    pub sanctioning_body: String,
    pub reason: String,
    pub starts_on: NaiveDate,
    /// `None` means the sanction is open-ended.
    pub ends_on: Option<NaiveDate>,
}

impl Sanction {
    pub fn new(
        kind: SanctionKind,
        sanctioning_body: impl Into<String>,
        reason: impl Into<String>,
        starts_on: NaiveDate,
        ends_on: Option<NaiveDate>,
    ) -> Result<Self, ParseError> {
        if let Some(end) = ends_on {
            if end < starts_on {
                return Err(ParseError::OutOfBounds(
                    "sanction end precedes its start".to_string(),
                ));
            }
        }
        Ok(Self {
            kind,
            sanctioning_body: sanctioning_body.into(),
            reason: reason.into(),
            starts_on,
            ends_on,
        })
    }

    /// Active at the reference date. The reference is always a parameter so
    /// the rule engine stays deterministic.
    #[must_use]
    pub fn active(&self, reference: NaiveDate) -> bool {
        match self.ends_on {
            None => true,
            Some(end) => end >= reference,
        }
    }
}
