//! Critical-alert detection. Pure function, zero IO.
//!
//! Alerts and the cumulative score are independent dimensions; this module
//! must never import the score module.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use graftwatch_model::{
    AlertKind, CompanyId, Contract, CriticalAlert, Donation, OwnershipLink, PersonHash, Sanction,
    Severity, Supplier, TenderNumber,
};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Graph-derived view of one supplier connected to the subject, used only by
/// the tender-rotation detector.
#[derive(Debug, Clone)]
pub struct RelatedSupplier {
    pub company_id: CompanyId,
    pub partner_hashes: Vec<PersonHash>,
    pub tender_numbers: Vec<TenderNumber>,
}

/// Tunable thresholds for the strawman composite heuristic. The sources do
/// not pin these down, so they are configuration rather than constants.
#[derive(Debug, Clone)]
pub struct StrawmanConfig {
    pub partner_min_age: i32,
    pub partner_max_age: i32,
    pub capital_ceiling: Decimal,
    pub max_days_to_first_contract: i64,
    pub min_contract_total: Decimal,
}

impl Default for StrawmanConfig {
    fn default() -> Self {
        Self {
            partner_min_age: 20,
            partner_max_age: 80,
            capital_ceiling: Decimal::from(10_000),
            max_days_to_first_contract: 365,
            min_contract_total: Decimal::from(200_000),
        }
    }
}

/// In-memory collections the detectors run over. `related` is optional: the
/// tender-rotation detector only evaluates when a graph+contracts view was
/// assembled for the request.
#[derive(Debug, Clone)]
pub struct AlertContext<'a> {
    pub links: &'a [OwnershipLink],
    pub contracts: &'a [Contract],
    pub sanctions: &'a [Sanction],
    pub donations: &'a [Donation],
    pub related: Option<&'a [RelatedSupplier]>,
    pub reference: NaiveDate,
    pub detected_at: DateTime<Utc>,
    pub strawman: StrawmanConfig,
}

const DONATION_THRESHOLD: i64 = 10_000;
const CONTRACT_THRESHOLD_FOR_DONATION: i64 = 500_000;

/// Same input, same output. Detectors run in severity-table order; duplicate
/// `(kind, partner)` pairs collapse to the first occurrence.
#[must_use]
pub fn detect_critical_alerts(supplier: &Supplier, ctx: &AlertContext<'_>) -> Vec<CriticalAlert> {
    let mut alerts: Vec<CriticalAlert> = Vec::new();
    alerts.extend(detect_partner_public_servant(ctx));
    alerts.extend(detect_sanctioned_still_contracting(ctx));
    alerts.extend(detect_tender_rotation(ctx));
    alerts.extend(detect_donation_to_awarder(ctx));
    alerts.extend(detect_partner_sanctioned_elsewhere(ctx));
    alerts.extend(detect_strawman(supplier, ctx));

    let mut seen: HashSet<(AlertKind, Option<PersonHash>)> = HashSet::new();
    alerts.retain(|a| seen.insert((a.kind, a.partner_hash.clone())));
    alerts
}

fn alert(
    kind: AlertKind,
    severity: Severity,
    description: String,
    evidence: String,
    ctx: &AlertContext<'_>,
    partner_hash: Option<PersonHash>,
) -> CriticalAlert {
    CriticalAlert {
        kind,
        severity,
        description,
        evidence,
        detected_at: ctx.detected_at,
        partner_hash,
    }
}

fn detect_partner_public_servant(ctx: &AlertContext<'_>) -> Vec<CriticalAlert> {
    ctx.links
        .iter()
        .filter(|link| link.partner.is_public_servant)
        .map(|link| {
            let p = &link.partner;
            let description = match &p.employing_body {
                Some(body) => format!("Partner {} is a public servant ({body})", p.name),
                None => format!("Partner {} is a public servant", p.name),
            };
            let mut evidence = format!("partner_hash={}, name={}", p.person_hash, p.name);
            if let Some(body) = &p.employing_body {
                evidence.push_str(&format!(", body={body}"));
            }
            alert(
                AlertKind::PartnerIsPublicServant,
                Severity::Critical,
                description,
                evidence,
                ctx,
                Some(p.person_hash.clone()),
            )
        })
        .collect()
}

fn detect_sanctioned_still_contracting(ctx: &AlertContext<'_>) -> Vec<CriticalAlert> {
    let active: Vec<&Sanction> = ctx
        .sanctions
        .iter()
        .filter(|s| s.active(ctx.reference))
        .collect();
    if active.is_empty() {
        return Vec::new();
    }
    // A contract counts only when signed on or after some active sanction's
    // start; an expired sanction never reaches this detector.
    let matching_contracts = ctx
        .contracts
        .iter()
        .filter(|c| {
            c.signed_on
                .is_some_and(|signed| active.iter().any(|s| signed >= s.starts_on))
        })
        .count();
    if matching_contracts == 0 {
        return Vec::new();
    }
    let kinds: Vec<&str> = active.iter().map(|s| s.kind.as_str()).collect();
    vec![alert(
        AlertKind::SanctionedSupplierStillContracting,
        Severity::Critical,
        format!(
            "Supplier under {} active sanction(s) signed {} contract(s) after sanction start",
            active.len(),
            matching_contracts
        ),
        format!(
            "active_sanctions={}, contracts_after_start={}",
            kinds.join("|"),
            matching_contracts
        ),
        ctx,
        None,
    )]
}

fn detect_tender_rotation(ctx: &AlertContext<'_>) -> Vec<CriticalAlert> {
    let Some(related) = ctx.related else {
        return Vec::new();
    };
    let own_partners: HashSet<&PersonHash> =
        ctx.links.iter().map(|l| &l.partner.person_hash).collect();
    let own_tenders: HashSet<&TenderNumber> = ctx
        .contracts
        .iter()
        .filter_map(|c| c.tender_number.as_ref())
        .collect();
    if own_partners.is_empty() || own_tenders.is_empty() {
        return Vec::new();
    }

    let mut counterparts: Vec<&CompanyId> = related
        .iter()
        .filter(|r| {
            r.partner_hashes.iter().any(|h| own_partners.contains(h))
                && r.tender_numbers.iter().any(|t| own_tenders.contains(t))
        })
        .map(|r| &r.company_id)
        .collect();
    if counterparts.is_empty() {
        return Vec::new();
    }
    counterparts.sort();
    counterparts.dedup();
    let ids: Vec<&str> = counterparts.iter().map(|c| c.as_str()).collect();
    vec![alert(
        AlertKind::TenderRotation,
        Severity::Critical,
        format!(
            "Shares a partner and a procurement event with {} other supplier(s)",
            ids.len()
        ),
        format!("counterparts={}", ids.join("|")),
        ctx,
        None,
    )]
}

fn detect_donation_to_awarder(ctx: &AlertContext<'_>) -> Vec<CriticalAlert> {
    let donation_floor = Decimal::from(DONATION_THRESHOLD);
    let contract_floor = Decimal::from(CONTRACT_THRESHOLD_FOR_DONATION);
    for donation in ctx.donations {
        if donation.amount.amount() <= donation_floor {
            continue;
        }
        let Some(org) = &donation.linked_org else {
            continue;
        };
        let Some(contract) = ctx
            .contracts
            .iter()
            .find(|c| &c.org_code == org && c.value.amount() > contract_floor)
        else {
            continue;
        };
        return vec![alert(
            AlertKind::DonationToContractAwarder,
            Severity::Severe,
            format!(
                "Donation of {} to a candidate aligned with body {org} holding a {} contract",
                donation.amount, contract.value
            ),
            format!(
                "donation_amount={}, org={org}, contract_value={}, election_year={}",
                donation.amount.canonical_string(),
                contract.value.canonical_string(),
                donation.election_year
            ),
            ctx,
            None,
        )];
    }
    Vec::new()
}

fn detect_partner_sanctioned_elsewhere(ctx: &AlertContext<'_>) -> Vec<CriticalAlert> {
    ctx.links
        .iter()
        .filter(|link| link.partner.is_sanctioned)
        .map(|link| {
            let p = &link.partner;
            alert(
                AlertKind::PartnerSanctionedElsewhere,
                Severity::Severe,
                format!("Partner {} belongs to a sanctioned company", p.name),
                format!("partner_hash={}, name={}", p.person_hash, p.name),
                ctx,
                Some(p.person_hash.clone()),
            )
        })
        .collect()
}

fn detect_strawman(supplier: &Supplier, ctx: &AlertContext<'_>) -> Vec<CriticalAlert> {
    let cfg = &ctx.strawman;
    let mut out = Vec::new();

    // Implausible-age branch. Partners without a disclosed birth year are
    // skipped, never guessed.
    for link in ctx.links {
        let p = &link.partner;
        let Some(birth_year) = p.birth_year else {
            continue;
        };
        let age = ctx.reference.year() - birth_year;
        if age < cfg.partner_min_age || age > cfg.partner_max_age {
            out.push(alert(
                AlertKind::Strawman,
                Severity::Critical,
                format!("Partner {} has an implausible age ({age}) for the role", p.name),
                format!("partner_hash={}, age={age}", p.person_hash),
                ctx,
                Some(p.person_hash.clone()),
            ));
        }
    }

    // Composite branch: young company, disproportionate capital, high
    // government total. Every input must be present; missing data yields
    // nothing.
    let (Some(opened_on), Some(capital)) = (supplier.opened_on, supplier.capital) else {
        return out;
    };
    let Some(first_signed) = ctx.contracts.iter().filter_map(|c| c.signed_on).min() else {
        return out;
    };
    let days_to_first = (first_signed - opened_on).num_days();
    let total: Decimal = ctx.contracts.iter().map(|c| c.value.amount()).sum();
    if days_to_first < cfg.max_days_to_first_contract
        && capital.amount() < cfg.capital_ceiling
        && total >= cfg.min_contract_total
    {
        out.push(alert(
            AlertKind::Strawman,
            Severity::Critical,
            "Company profile matches the front-man pattern: new entrant, minimal capital, \
             heavy government revenue"
                .to_string(),
            format!(
                "capital={}, opened_on={opened_on}, first_contract={first_signed}, \
                 contracted_total={total}",
                capital.canonical_string()
            ),
            ctx,
            None,
        ));
    }
    out
}
