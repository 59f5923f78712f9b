use crate::ids::ParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weak signals whose combination suggests a shell-company pattern. Each is
/// an independent predicate with a fixed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    LowCapital,
    RecentCompany,
    ActivityMismatch,
    PartnerInManySuppliers,
    SharedAddress,
    ExclusiveBuyer,
    NoEmployees,
    SuddenGrowth,
    HistoricalSanction,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 9] = [
        IndicatorKind::LowCapital,
        IndicatorKind::RecentCompany,
        IndicatorKind::ActivityMismatch,
        IndicatorKind::PartnerInManySuppliers,
        IndicatorKind::SharedAddress,
        IndicatorKind::ExclusiveBuyer,
        IndicatorKind::NoEmployees,
        IndicatorKind::SuddenGrowth,
        IndicatorKind::HistoricalSanction,
    ];

    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "LOW_CAPITAL" => Ok(Self::LowCapital),
            "RECENT_COMPANY" => Ok(Self::RecentCompany),
            "ACTIVITY_MISMATCH" => Ok(Self::ActivityMismatch),
            "PARTNER_IN_MANY_SUPPLIERS" => Ok(Self::PartnerInManySuppliers),
            "SHARED_ADDRESS" => Ok(Self::SharedAddress),
            "EXCLUSIVE_BUYER" => Ok(Self::ExclusiveBuyer),
            "NO_EMPLOYEES" => Ok(Self::NoEmployees),
            "SUDDEN_GROWTH" => Ok(Self::SuddenGrowth),
            "HISTORICAL_SANCTION" => Ok(Self::HistoricalSanction),
            other => Err(ParseError::InvalidId(format!(
                "unknown indicator kind: {other}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowCapital => "LOW_CAPITAL",
            Self::RecentCompany => "RECENT_COMPANY",
            Self::ActivityMismatch => "ACTIVITY_MISMATCH",
            Self::PartnerInManySuppliers => "PARTNER_IN_MANY_SUPPLIERS",
            Self::SharedAddress => "SHARED_ADDRESS",
            Self::ExclusiveBuyer => "EXCLUSIVE_BUYER",
            Self::NoEmployees => "NO_EMPLOYEES",
            Self::SuddenGrowth => "SUDDEN_GROWTH",
            Self::HistoricalSanction => "HISTORICAL_SANCTION",
        }
    }
}

/// Weight table as a single function, not constants scattered through the
/// predicates. Theoretical sum is 105; the total is capped at 100.
#[must_use]
pub const fn indicator_weight(kind: IndicatorKind) -> u8 {
    match kind {
        IndicatorKind::LowCapital => 15,
        IndicatorKind::RecentCompany => 10,
        IndicatorKind::ActivityMismatch => 10,
        IndicatorKind::PartnerInManySuppliers => 20,
        IndicatorKind::SharedAddress => 15,
        IndicatorKind::ExclusiveBuyer => 10,
        IndicatorKind::NoEmployees => 10,
        IndicatorKind::SuddenGrowth => 10,
        IndicatorKind::HistoricalSanction => 5,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreIndicator {
    pub kind: IndicatorKind,
    pub weight: u8,
    pub description: String,
    pub evidence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskBand {
    /// Closed-interval lookup: [0,20] Low, [21,40] Moderate, [41,65] High,
    /// [66,100] Critical.
    #[must_use]
    pub const fn from_total(total: u8) -> Self {
        if total <= 20 {
            Self::Low
        } else if total <= 40 {
            Self::Moderate
        } else if total <= 65 {
            Self::High
        } else {
            Self::Critical
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// Cumulative risk score: only active indicators appear in the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub indicators: Vec<ScoreIndicator>,
    pub computed_at: DateTime<Utc>,
}

impl ScoreBreakdown {
    /// `min(100, Σ weights)`.
    #[must_use]
    pub fn total(&self) -> u8 {
        let sum: u32 = self.indicators.iter().map(|i| u32::from(i.weight)).sum();
        sum.min(100) as u8
    }

    #[must_use]
    pub fn band(&self) -> RiskBand {
        RiskBand::from_total(self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicator(kind: IndicatorKind) -> ScoreIndicator {
        ScoreIndicator {
            kind,
            weight: indicator_weight(kind),
            description: String::new(),
            evidence: String::new(),
        }
    }

    #[test]
    fn total_caps_at_one_hundred() {
        let all = ScoreBreakdown {
            indicators: IndicatorKind::ALL.into_iter().map(indicator).collect(),
            computed_at: Utc::now(),
        };
        let raw: u32 = IndicatorKind::ALL
            .into_iter()
            .map(|k| u32::from(indicator_weight(k)))
            .sum();
        assert_eq!(raw, 105);
        assert_eq!(all.total(), 100);
        assert_eq!(all.band(), RiskBand::Critical);
    }

    #[test]
    fn band_boundaries_are_closed() {
        assert_eq!(RiskBand::from_total(0), RiskBand::Low);
        assert_eq!(RiskBand::from_total(20), RiskBand::Low);
        assert_eq!(RiskBand::from_total(21), RiskBand::Moderate);
        assert_eq!(RiskBand::from_total(40), RiskBand::Moderate);
        assert_eq!(RiskBand::from_total(41), RiskBand::High);
        assert_eq!(RiskBand::from_total(65), RiskBand::High);
        assert_eq!(RiskBand::from_total(66), RiskBand::Critical);
        assert_eq!(RiskBand::from_total(100), RiskBand::Critical);
    }

    #[test]
    fn indicator_kinds_round_trip() {
        for kind in IndicatorKind::ALL {
            assert_eq!(IndicatorKind::parse(kind.as_str()).expect("kind"), kind);
        }
    }
}
