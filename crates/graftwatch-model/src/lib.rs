#![forbid(unsafe_code)]
//! Graftwatch model SSOT.
//!
//! Value types validate on construction; entities are plain records whose
//! constructors enforce the invariants the analytical store cannot.

mod alert;
mod contract;
mod donation;
mod ids;
mod money;
mod ownership;
mod sanction;
mod score;
mod supplier;

pub use alert::{AlertKind, CriticalAlert, Severity};
pub use contract::Contract;
pub use donation::{Candidate, Donation};
pub use ids::{
    strip_id_punctuation, ActivityCode, CompanyId, GovOrgCode, ParseError, PersonHash, PersonId,
    TenderNumber, ACTIVITY_CODE_MAX_LEN, GOV_ORG_CODE_MAX_LEN, TENDER_NUMBER_MAX_LEN,
};
pub use money::{Money, Share};
pub use ownership::{OwnershipLink, Partner};
pub use sanction::{Sanction, SanctionKind};
pub use score::{indicator_weight, IndicatorKind, RiskBand, ScoreBreakdown, ScoreIndicator};
pub use supplier::{Address, CadastralStatus, Supplier};

pub const CRATE_NAME: &str = "graftwatch-model";
