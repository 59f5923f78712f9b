//! Capability-shaped repository contracts. Each consumer names exactly the
//! operations it needs; the SQLite adapter satisfies the union. No
//! inheritance tree.

use crate::error::StoreError;
use crate::graph::GraphProjection;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use graftwatch_model::{
    AlertKind, CompanyId, Contract, Donation, GovOrgCode, Money, OwnershipLink, PersonHash,
    RiskBand, Sanction, Severity, Supplier, TenderNumber,
};

/// Ranking/search row: the slice of `dim_supplier` the list endpoints need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierSummaryRow {
    pub company_id: CompanyId,
    pub legal_name: String,
    pub status: String,
    pub score: u8,
    pub band: RiskBand,
    pub alert_count: u32,
    pub max_severity: Option<Severity>,
    pub contract_count: u64,
    pub contracted_total: Money,
}

/// Feed row, already joined with the owning supplier and optional partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertFeedRow {
    pub kind: AlertKind,
    pub severity: Severity,
    pub description: String,
    pub evidence: String,
    pub detected_at: DateTime<Utc>,
    pub company_id: CompanyId,
    pub legal_name: String,
    pub partner_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContractFilter {
    pub supplier: Option<CompanyId>,
    pub org_code: Option<GovOrgCode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFreshness {
    pub source: String,
    pub last_update: Option<String>,
    pub row_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRollup {
    pub total_suppliers: i64,
    pub total_contracts: i64,
    pub total_alerts: i64,
    pub sources: Vec<SourceFreshness>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgSummary {
    pub code: GovOrgCode,
    pub name: String,
    pub acronym: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgTopSupplier {
    pub company_id: CompanyId,
    pub legal_name: String,
    pub score: u8,
    pub contracted_total: Money,
    pub contract_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgDashboard {
    pub org: OrgSummary,
    pub contract_count: i64,
    pub contracted_total: Money,
    pub supplier_count: i64,
    pub top_suppliers: Vec<OrgTopSupplier>,
}

/// Input for the tender-rotation detector: suppliers connected to the
/// subject through shared partners, with the tenders they appeared under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedSupplierRow {
    pub company_id: CompanyId,
    pub partner_hashes: Vec<PersonHash>,
    pub tender_numbers: Vec<TenderNumber>,
}

#[async_trait]
pub trait SupplierReader: Send + Sync {
    async fn supplier_by_id(&self, id: &CompanyId) -> Result<Option<Supplier>, StoreError>;
    async fn rank_by_score(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SupplierSummaryRow>, StoreError>;
    async fn search_by_name_or_id(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<SupplierSummaryRow>, StoreError>;
    async fn count_suppliers(&self) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn contracts(
        &self,
        filter: &ContractFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contract>, StoreError>;
    async fn contracts_of(&self, id: &CompanyId) -> Result<Vec<Contract>, StoreError>;
}

#[async_trait]
pub trait SanctionReader: Send + Sync {
    async fn sanctions_for(&self, id: &CompanyId) -> Result<Vec<Sanction>, StoreError>;
}

#[async_trait]
pub trait PartnerReader: Send + Sync {
    async fn partners_of(&self, id: &CompanyId) -> Result<Vec<OwnershipLink>, StoreError>;
}

#[async_trait]
pub trait DonationReader: Send + Sync {
    async fn donations_for(&self, id: &CompanyId) -> Result<Vec<Donation>, StoreError>;
}

#[async_trait]
pub trait RelatedViewReader: Send + Sync {
    async fn related_suppliers(
        &self,
        id: &CompanyId,
    ) -> Result<Vec<RelatedSupplierRow>, StoreError>;
}

#[async_trait]
pub trait AlertFeedReader: Send + Sync {
    async fn alert_feed(&self, limit: i64, offset: i64) -> Result<Vec<AlertFeedRow>, StoreError>;
    async fn alert_feed_by_kind(
        &self,
        kind: AlertKind,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertFeedRow>, StoreError>;
}

#[async_trait]
pub trait StatsReader: Send + Sync {
    async fn stats_rollup(&self) -> Result<StatsRollup, StoreError>;
}

#[async_trait]
pub trait OrgDashboardReader: Send + Sync {
    async fn org_dashboard(&self, code: &GovOrgCode) -> Result<Option<OrgDashboard>, StoreError>;
}

#[async_trait]
pub trait GraphReader: Send + Sync {
    /// `Ok(None)` when the seed supplier does not exist.
    async fn graph_two_hops(
        &self,
        id: &CompanyId,
        max_nodes: usize,
    ) -> Result<Option<GraphProjection>, StoreError>;
}
