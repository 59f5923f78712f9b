//! Cumulative-score computation. Pure function, zero IO.
//!
//! Alerts and the cumulative score are independent dimensions; this module
//! must never import the alert module.

use crate::activity;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use graftwatch_model::{
    indicator_weight, Contract, IndicatorKind, OwnershipLink, Sanction, ScoreBreakdown,
    ScoreIndicator, Supplier,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

const CONTRACT_FLOOR_FOR_LOW_CAPITAL: i64 = 100_000;
const RECENT_COMPANY_MAX_DAYS: i64 = 183;
const MANY_SUPPLIERS_THRESHOLD: u32 = 3;
const GROWTH_RATIO: i64 = 10;

/// In-memory collections the indicator predicates run over.
#[derive(Debug, Clone)]
pub struct ScoreContext<'a> {
    pub links: &'a [OwnershipLink],
    pub contracts: &'a [Contract],
    pub sanctions: &'a [Sanction],
    pub reference: NaiveDate,
    pub computed_at: DateTime<Utc>,
}

/// Each indicator is evaluated independently; the breakdown carries only the
/// active ones and the total is `min(100, Σ weights)`.
#[must_use]
pub fn compute_cumulative_score(supplier: &Supplier, ctx: &ScoreContext<'_>) -> ScoreBreakdown {
    let indicators = [
        low_capital(supplier, ctx),
        recent_company(supplier, ctx),
        activity_mismatch(supplier, ctx),
        partner_in_many_suppliers(ctx),
        shared_address(supplier),
        exclusive_buyer(ctx),
        no_employees(supplier, ctx),
        sudden_growth(ctx),
        historical_sanction(ctx),
    ]
    .into_iter()
    .flatten()
    .collect();
    ScoreBreakdown {
        indicators,
        computed_at: ctx.computed_at,
    }
}

fn indicator(kind: IndicatorKind, description: String, evidence: String) -> ScoreIndicator {
    ScoreIndicator {
        kind,
        weight: indicator_weight(kind),
        description,
        evidence,
    }
}

fn low_capital(supplier: &Supplier, ctx: &ScoreContext<'_>) -> Option<ScoreIndicator> {
    let capital = supplier.capital?;
    let floor = activity::sector_capital_floor(
        supplier.activity_code.as_ref().and_then(activity::category_of),
    );
    if capital.amount() >= floor {
        return None;
    }
    let material = ctx
        .contracts
        .iter()
        .find(|c| c.value.amount() > Decimal::from(CONTRACT_FLOOR_FOR_LOW_CAPITAL))?;
    Some(indicator(
        IndicatorKind::LowCapital,
        format!(
            "Declared capital {} below the sector floor {floor} with a {} contract",
            capital, material.value
        ),
        format!(
            "capital={}, sector_floor={floor}, contract_value={}",
            capital.canonical_string(),
            material.value.canonical_string()
        ),
    ))
}

fn recent_company(supplier: &Supplier, ctx: &ScoreContext<'_>) -> Option<ScoreIndicator> {
    let opened_on = supplier.opened_on?;
    let first_signed = ctx.contracts.iter().filter_map(|c| c.signed_on).min()?;
    let days = (first_signed - opened_on).num_days();
    if days >= RECENT_COMPANY_MAX_DAYS {
        return None;
    }
    Some(indicator(
        IndicatorKind::RecentCompany,
        format!(
            "Company opened on {opened_on} won its first contract on {first_signed} \
             ({days} days later)"
        ),
        format!("opened_on={opened_on}, first_contract={first_signed}, days={days}"),
    ))
}

fn activity_mismatch(supplier: &Supplier, ctx: &ScoreContext<'_>) -> Option<ScoreIndicator> {
    let code = supplier.activity_code.as_ref()?;
    let declared = activity::category_of(code)?;
    let contract = ctx.contracts.iter().find(|c| {
        c.subject
            .as_deref()
            .and_then(activity::infer_subject_category)
            .is_some_and(|subject| activity::incompatible(declared, subject))
    })?;
    let subject_category = contract
        .subject
        .as_deref()
        .and_then(activity::infer_subject_category)?;
    Some(indicator(
        IndicatorKind::ActivityMismatch,
        format!(
            "Primary activity {code} ({}) is incompatible with contracted subject ({})",
            declared.as_str(),
            subject_category.as_str()
        ),
        format!(
            "activity_code={code}, declared_category={}, subject_category={}",
            declared.as_str(),
            subject_category.as_str()
        ),
    ))
}

fn partner_in_many_suppliers(ctx: &ScoreContext<'_>) -> Option<ScoreIndicator> {
    let flagged: Vec<&OwnershipLink> = ctx
        .links
        .iter()
        .filter(|l| l.partner.gov_supplier_count >= MANY_SUPPLIERS_THRESHOLD)
        .collect();
    if flagged.is_empty() {
        return None;
    }
    let detail: Vec<String> = flagged
        .iter()
        .map(|l| format!("{}:{}", l.partner.person_hash, l.partner.gov_supplier_count))
        .collect();
    Some(indicator(
        IndicatorKind::PartnerInManySuppliers,
        format!(
            "{} partner(s) present in {MANY_SUPPLIERS_THRESHOLD}+ government suppliers",
            flagged.len()
        ),
        format!("partners={}", detail.join("|")),
    ))
}

fn shared_address(supplier: &Supplier) -> Option<ScoreIndicator> {
    if supplier.shared_address_count == 0 {
        return None;
    }
    Some(indicator(
        IndicatorKind::SharedAddress,
        format!(
            "Street and number match {} other government supplier(s)",
            supplier.shared_address_count
        ),
        format!("shared_address_count={}", supplier.shared_address_count),
    ))
}

fn exclusive_buyer(ctx: &ScoreContext<'_>) -> Option<ScoreIndicator> {
    if ctx.contracts.is_empty() {
        return None;
    }
    let orgs: BTreeSet<&str> = ctx.contracts.iter().map(|c| c.org_code.as_str()).collect();
    if orgs.len() != 1 {
        return None;
    }
    let org = orgs.into_iter().next()?;
    Some(indicator(
        IndicatorKind::ExclusiveBuyer,
        format!("All {} contracts are with body {org}", ctx.contracts.len()),
        format!("org={org}, contract_count={}", ctx.contracts.len()),
    ))
}

fn no_employees(supplier: &Supplier, ctx: &ScoreContext<'_>) -> Option<ScoreIndicator> {
    // Absent labor data is absence of evidence, not evidence: stay inactive.
    if supplier.employee_count? != 0 {
        return None;
    }
    let service_contracts = ctx
        .contracts
        .iter()
        .filter(|c| {
            c.subject
                .as_deref()
                .and_then(activity::infer_subject_category)
                .is_some_and(activity::ActivityCategory::is_service)
        })
        .count();
    if service_contracts == 0 {
        return None;
    }
    Some(indicator(
        IndicatorKind::NoEmployees,
        format!(
            "No registered employees while holding {service_contracts} service contract(s)"
        ),
        format!("employee_count=0, service_contracts={service_contracts}"),
    ))
}

fn sudden_growth(ctx: &ScoreContext<'_>) -> Option<ScoreIndicator> {
    let mut yearly: BTreeMap<i32, Decimal> = BTreeMap::new();
    for c in ctx.contracts {
        if let Some(signed) = c.signed_on {
            *yearly.entry(signed.year()).or_insert(Decimal::ZERO) += c.value.amount();
        }
    }
    let years: Vec<(&i32, &Decimal)> = yearly.iter().collect();
    for pair in years.windows(2) {
        let (prev_year, prev_total) = pair[0];
        let (year, total) = pair[1];
        if *year != prev_year + 1 || prev_total.is_zero() {
            continue;
        }
        if *total >= *prev_total * Decimal::from(GROWTH_RATIO) {
            return Some(indicator(
                IndicatorKind::SuddenGrowth,
                format!(
                    "Contracted total jumped from {prev_total} in {prev_year} to {total} in {year}"
                ),
                format!(
                    "previous_year={prev_year}, previous_total={prev_total}, \
                     year={year}, total={total}"
                ),
            ));
        }
    }
    None
}

fn historical_sanction(ctx: &ScoreContext<'_>) -> Option<ScoreIndicator> {
    let expired: Vec<&Sanction> = ctx
        .sanctions
        .iter()
        .filter(|s| !s.active(ctx.reference))
        .collect();
    if expired.is_empty() {
        return None;
    }
    let kinds: Vec<&str> = expired.iter().map(|s| s.kind.as_str()).collect();
    Some(indicator(
        IndicatorKind::HistoricalSanction,
        format!("{} expired sanction(s) on record", expired.len()),
        format!("expired_sanctions={}", kinds.join("|")),
    ))
}
