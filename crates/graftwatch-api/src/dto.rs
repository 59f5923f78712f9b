// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The single edge kind of the ownership graph.
pub const GRAPH_EDGE_KIND: &str = "owns-share-of";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertDto {
    pub kind: String,
    pub severity: String,
    pub description: String,
    pub evidence: String,
    pub detected_at: String,
    pub partner_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorDto {
    pub kind: String,
    pub weight: u8,
    pub description: String,
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreDto {
    pub total: u8,
    pub band: String,
    pub indicators: Vec<IndicatorDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressDto {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartnerDto {
    pub person_hash: String,
    pub name: String,
    pub qualification: Option<String>,
    pub is_public_servant: bool,
    pub employing_body: Option<String>,
    pub capital_share: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SanctionDto {
    pub kind: String,
    pub sanctioning_body: String,
    pub reason: String,
    pub starts_on: String,
    pub ends_on: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractDto {
    pub org_code: String,
    pub value: String,
    pub subject: Option<String>,
    pub tender_number: Option<String>,
    pub signed_on: Option<String>,
    pub valid_until: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonationDto {
    pub candidate_name: String,
    pub candidate_party: Option<String>,
    pub candidate_office: Option<String>,
    pub amount: String,
    pub election_year: i32,
    pub via_partner: bool,
}

/// Enriched dossier: canonical field order is the declaration order below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dossier {
    pub company_id: String,
    pub legal_name: String,
    pub status: String,
    pub opened_on: Option<String>,
    pub capital: Option<String>,
    pub activity_code: Option<String>,
    pub activity_desc: Option<String>,
    pub address: Option<AddressDto>,
    pub contract_count: u64,
    pub contracted_total: String,
    pub alerts: Vec<AlertDto>,
    pub score: ScoreDto,
    pub partners: Vec<PartnerDto>,
    pub sanctions: Vec<SanctionDto>,
    pub contracts: Vec<ContractDto>,
    pub donations: Vec<DonationDto>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupplierSummary {
    pub company_id: String,
    pub legal_name: String,
    pub status: String,
    pub score: u8,
    pub band: String,
    pub alert_count: u32,
    pub max_severity: Option<String>,
    pub contract_count: u64,
    pub contracted_total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertFeedItem {
    pub kind: String,
    pub severity: String,
    pub description: String,
    pub evidence: String,
    pub detected_at: String,
    pub company_id: String,
    pub legal_name: String,
    pub partner_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphNodeDto {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub score: Option<u8>,
    pub alert_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphEdgeDto {
    pub source: String,
    pub target: String,
    pub kind: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphView {
    pub nodes: Vec<GraphNodeDto>,
    pub edges: Vec<GraphEdgeDto>,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDto {
    pub last_update: Option<String>,
    pub row_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stats {
    pub total_suppliers: i64,
    pub total_contracts: i64,
    pub total_alerts: i64,
    pub sources: BTreeMap<String, SourceDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrgDto {
    pub code: String,
    pub name: String,
    pub acronym: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrgTopSupplierDto {
    pub company_id: String,
    pub legal_name: String,
    pub score: u8,
    pub contracted_total: String,
    pub contract_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrgDashboardDto {
    pub org: OrgDto,
    pub contract_count: i64,
    pub contracted_total: String,
    pub supplier_count: i64,
    pub top_suppliers: Vec<OrgTopSupplierDto>,
}
