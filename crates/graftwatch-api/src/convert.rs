// SPDX-License-Identifier: Apache-2.0

//! Projection from domain entities and repository rows onto the wire DTOs.

use crate::dto::{
    AddressDto, AlertDto, AlertFeedItem, ContractDto, Dossier, DonationDto, GraphEdgeDto,
    GraphNodeDto, GraphView, IndicatorDto, OrgDashboardDto, OrgDto, OrgTopSupplierDto, PartnerDto,
    SanctionDto, ScoreDto, SourceDto, Stats, SupplierSummary, GRAPH_EDGE_KIND,
};
use chrono::NaiveDate;
use graftwatch_model::{
    Contract, CriticalAlert, Donation, OwnershipLink, Sanction, ScoreBreakdown, Supplier,
};
use graftwatch_store::{
    AlertFeedRow, GraphProjection, OrgDashboard, StatsRollup, SupplierSummaryRow,
};

#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn dossier(
    supplier: &Supplier,
    links: &[OwnershipLink],
    sanctions: &[Sanction],
    contracts: &[Contract],
    donations: &[Donation],
    alerts: &[CriticalAlert],
    score: &ScoreBreakdown,
    reference: NaiveDate,
    disclaimer: &str,
) -> Dossier {
    Dossier {
        company_id: supplier.company_id.as_str().to_string(),
        legal_name: supplier.legal_name.clone(),
        status: supplier.status.as_str().to_string(),
        opened_on: supplier.opened_on.map(|d| d.to_string()),
        capital: supplier.capital.map(|m| m.canonical_string()),
        activity_code: supplier.activity_code.as_ref().map(|c| c.as_str().to_string()),
        activity_desc: supplier.activity_desc.clone(),
        address: supplier.address.as_ref().map(|a| AddressDto {
            street: a.street.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            postal_code: a.postal_code.clone(),
        }),
        contract_count: supplier.contract_count,
        contracted_total: supplier.contracted_total.canonical_string(),
        alerts: alerts
            .iter()
            .map(|a| AlertDto {
                kind: a.kind.as_str().to_string(),
                severity: a.severity.as_str().to_string(),
                description: a.description.clone(),
                evidence: a.evidence.clone(),
                detected_at: a.detected_at.to_rfc3339(),
                partner_hash: a.partner_hash.as_ref().map(|h| h.as_str().to_string()),
            })
            .collect(),
        score: ScoreDto {
            total: score.total(),
            band: score.band().as_str().to_string(),
            indicators: score
                .indicators
                .iter()
                .map(|i| IndicatorDto {
                    kind: i.kind.as_str().to_string(),
                    weight: i.weight,
                    description: i.description.clone(),
                    evidence: i.evidence.clone(),
                })
                .collect(),
        },
        partners: links
            .iter()
            .map(|l| PartnerDto {
                person_hash: l.partner.person_hash.as_str().to_string(),
                name: l.partner.name.clone(),
                qualification: l.partner.qualification.clone(),
                is_public_servant: l.partner.is_public_servant,
                employing_body: l.partner.employing_body.clone(),
                capital_share: l.capital_share.map(|s| s.percent().to_string()),
            })
            .collect(),
        sanctions: sanctions
            .iter()
            .map(|s| SanctionDto {
                kind: s.kind.as_str().to_string(),
                sanctioning_body: s.sanctioning_body.clone(),
                reason: s.reason.clone(),
                starts_on: s.starts_on.to_string(),
                ends_on: s.ends_on.map(|d| d.to_string()),
                active: s.active(reference),
            })
            .collect(),
        contracts: contracts.iter().map(contract_dto).collect(),
        donations: donations
            .iter()
            .map(|d| DonationDto {
                candidate_name: d.candidate.name.clone(),
                candidate_party: d.candidate.party.clone(),
                candidate_office: d.candidate.office.clone(),
                amount: d.amount.canonical_string(),
                election_year: d.election_year,
                via_partner: d.partner_hash.is_some(),
            })
            .collect(),
        disclaimer: disclaimer.to_string(),
    }
}

#[must_use]
pub fn contract_dto(c: &Contract) -> ContractDto {
    ContractDto {
        org_code: c.org_code.as_str().to_string(),
        value: c.value.canonical_string(),
        subject: c.subject.clone(),
        tender_number: c.tender_number.as_ref().map(|t| t.as_str().to_string()),
        signed_on: c.signed_on.map(|d| d.to_string()),
        valid_until: c.valid_until.map(|d| d.to_string()),
    }
}

#[must_use]
pub fn supplier_summary(row: &SupplierSummaryRow) -> SupplierSummary {
    SupplierSummary {
        company_id: row.company_id.as_str().to_string(),
        legal_name: row.legal_name.clone(),
        status: row.status.clone(),
        score: row.score,
        band: row.band.as_str().to_string(),
        alert_count: row.alert_count,
        max_severity: row.max_severity.map(|s| s.as_str().to_string()),
        contract_count: row.contract_count,
        contracted_total: row.contracted_total.canonical_string(),
    }
}

#[must_use]
pub fn alert_feed_item(row: &AlertFeedRow) -> AlertFeedItem {
    AlertFeedItem {
        kind: row.kind.as_str().to_string(),
        severity: row.severity.as_str().to_string(),
        description: row.description.clone(),
        evidence: row.evidence.clone(),
        detected_at: row.detected_at.to_rfc3339(),
        company_id: row.company_id.as_str().to_string(),
        legal_name: row.legal_name.clone(),
        partner_name: row.partner_name.clone(),
    }
}

#[must_use]
pub fn graph_view(projection: GraphProjection) -> GraphView {
    GraphView {
        nodes: projection
            .nodes
            .into_iter()
            .map(|n| GraphNodeDto {
                id: n.id,
                kind: n.kind.as_str().to_string(),
                label: n.label,
                score: n.score,
                alert_count: n.alert_count,
            })
            .collect(),
        edges: projection
            .edges
            .into_iter()
            .map(|e| GraphEdgeDto {
                source: e.source,
                target: e.target,
                kind: GRAPH_EDGE_KIND.to_string(),
                label: e.label,
            })
            .collect(),
        truncated: projection.truncated,
    }
}

#[must_use]
pub fn stats(rollup: StatsRollup) -> Stats {
    Stats {
        total_suppliers: rollup.total_suppliers,
        total_contracts: rollup.total_contracts,
        total_alerts: rollup.total_alerts,
        sources: rollup
            .sources
            .into_iter()
            .map(|s| {
                (
                    s.source,
                    SourceDto {
                        last_update: s.last_update,
                        row_count: s.row_count,
                    },
                )
            })
            .collect(),
    }
}

#[must_use]
pub fn org_dashboard(dashboard: OrgDashboard) -> OrgDashboardDto {
    OrgDashboardDto {
        org: OrgDto {
            code: dashboard.org.code.as_str().to_string(),
            name: dashboard.org.name,
            acronym: dashboard.org.acronym,
        },
        contract_count: dashboard.contract_count,
        contracted_total: dashboard.contracted_total.canonical_string(),
        supplier_count: dashboard.supplier_count,
        top_suppliers: dashboard
            .top_suppliers
            .into_iter()
            .map(|t| OrgTopSupplierDto {
                company_id: t.company_id.as_str().to_string(),
                legal_name: t.legal_name,
                score: t.score,
                contracted_total: t.contracted_total.canonical_string(),
                contract_count: t.contract_count,
            })
            .collect(),
    }
}
