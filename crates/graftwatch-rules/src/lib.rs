#![forbid(unsafe_code)]
//! Pure rule engine. Two independent dimensions, two entry points:
//!
//! - [`alerts::detect_critical_alerts`] — binary suspicious conditions.
//! - [`score::compute_cumulative_score`] — weighted weak signals.
//!
//! The two modules never import each other; alerts never feed the score and
//! the score never feeds alerts. Everything here is side-effect-free: same
//! input, same output, zero IO. Reference dates and timestamps are always
//! supplied by the caller.

pub mod activity;
pub mod alerts;
pub mod score;

pub use alerts::{detect_critical_alerts, AlertContext, RelatedSupplier, StrawmanConfig};
pub use score::{compute_cumulative_score, ScoreContext};

pub const CRATE_NAME: &str = "graftwatch-rules";
