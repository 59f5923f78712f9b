#![forbid(unsafe_code)]
//! Repository contracts and the analytical-store adapter.
//!
//! The store is a columnar SQLite file produced offline by the ingestion
//! pipeline and opened here strictly read-only. Every query goes through a
//! parameterized prepared statement; composing identifier literals into SQL
//! text is a forbidden pattern.

mod error;
mod graph;
mod row_decode;
mod sqlite;

pub mod contracts;
pub mod fixture;

pub use contracts::{
    AlertFeedReader, AlertFeedRow, ContractFilter, ContractReader, DonationReader, GraphReader,
    OrgDashboard, OrgDashboardReader, OrgSummary, OrgTopSupplier, PartnerReader,
    RelatedSupplierRow, RelatedViewReader, SanctionReader, SourceFreshness, StatsReader,
    StatsRollup, SupplierReader, SupplierSummaryRow,
};
pub use error::StoreError;
pub use graph::{GraphEdge, GraphNode, GraphNodeKind, GraphProjection, DEFAULT_GRAPH_MAX_NODES};
pub use sqlite::SqliteStore;

pub const CRATE_NAME: &str = "graftwatch-store";
