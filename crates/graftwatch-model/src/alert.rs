use crate::ids::{ParseError, PersonHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary suspicious conditions. An alert exists iff its condition is
/// detected; it is independent of the cumulative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    PartnerIsPublicServant,
    SanctionedSupplierStillContracting,
    TenderRotation,
    DonationToContractAwarder,
    PartnerSanctionedElsewhere,
    Strawman,
}

impl AlertKind {
    pub const ALL: [AlertKind; 6] = [
        AlertKind::PartnerIsPublicServant,
        AlertKind::SanctionedSupplierStillContracting,
        AlertKind::TenderRotation,
        AlertKind::DonationToContractAwarder,
        AlertKind::PartnerSanctionedElsewhere,
        AlertKind::Strawman,
    ];

    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "PARTNER_IS_PUBLIC_SERVANT" => Ok(Self::PartnerIsPublicServant),
            "SANCTIONED_SUPPLIER_STILL_CONTRACTING" => Ok(Self::SanctionedSupplierStillContracting),
            "TENDER_ROTATION" => Ok(Self::TenderRotation),
            "DONATION_TO_CONTRACT_AWARDER" => Ok(Self::DonationToContractAwarder),
            "PARTNER_SANCTIONED_ELSEWHERE" => Ok(Self::PartnerSanctionedElsewhere),
            "STRAWMAN" => Ok(Self::Strawman),
            other => Err(ParseError::InvalidId(format!("unknown alert kind: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PartnerIsPublicServant => "PARTNER_IS_PUBLIC_SERVANT",
            Self::SanctionedSupplierStillContracting => "SANCTIONED_SUPPLIER_STILL_CONTRACTING",
            Self::TenderRotation => "TENDER_ROTATION",
            Self::DonationToContractAwarder => "DONATION_TO_CONTRACT_AWARDER",
            Self::PartnerSanctionedElsewhere => "PARTNER_SANCTIONED_ELSEWHERE",
            Self::Strawman => "STRAWMAN",
        }
    }
}

/// Ordering derives from declaration order: `Severe < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Severe,
    Critical,
}

impl Severity {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "SEVERE" => Ok(Self::Severe),
            "CRITICAL" => Ok(Self::Critical),
            other => Err(ParseError::InvalidId(format!("unknown severity: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Severe => "SEVERE",
            Self::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalAlert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub description: String,
    /// Structured, deterministic `key=value` text listing the identifiers
    /// that triggered the alert.
    pub evidence: String,
    pub detected_at: DateTime<Utc>,
    pub partner_hash: Option<PersonHash>,
}

impl CriticalAlert {
    pub fn new(
        kind: AlertKind,
        severity: Severity,
        description: impl Into<String>,
        evidence: impl Into<String>,
        detected_at: DateTime<Utc>,
        partner_hash: Option<PersonHash>,
    ) -> Result<Self, ParseError> {
        let evidence = evidence.into();
        if evidence.trim().is_empty() {
            return Err(ParseError::MissingField(
                "critical alert needs evidence".to_string(),
            ));
        }
        Ok(Self {
            kind,
            severity,
            description: description.into(),
            evidence,
            detected_at,
            partner_hash,
        })
    }
}
