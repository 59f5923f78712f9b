//! Raw row shapes, decoded by column index exactly as the statements
//! project them. Hydration into domain entities happens in the adapter.

use crate::error::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use graftwatch_model::Money;
use rusqlite::Row;

#[derive(Debug, Clone)]
pub(crate) struct RawSupplierRow {
    pub company_id: String,
    pub legal_name: String,
    pub status: String,
    pub opened_on: Option<String>,
    pub capital: Option<String>,
    pub activity_code: Option<String>,
    pub activity_desc: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub shared_address_count: i64,
    pub employee_count: Option<i64>,
    pub contract_count: i64,
    pub contracted_total: Option<String>,
}

impl RawSupplierRow {
    pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            company_id: row.get::<_, String>(0)?,
            legal_name: row.get::<_, String>(1)?,
            status: row.get::<_, String>(2)?,
            opened_on: row.get::<_, Option<String>>(3)?,
            capital: row.get::<_, Option<String>>(4)?,
            activity_code: row.get::<_, Option<String>>(5)?,
            activity_desc: row.get::<_, Option<String>>(6)?,
            street: row.get::<_, Option<String>>(7)?,
            city: row.get::<_, Option<String>>(8)?,
            state: row.get::<_, Option<String>>(9)?,
            postal_code: row.get::<_, Option<String>>(10)?,
            shared_address_count: row.get::<_, Option<i64>>(11)?.unwrap_or(0),
            employee_count: row.get::<_, Option<i64>>(12)?,
            contract_count: row.get::<_, Option<i64>>(13)?.unwrap_or(0),
            contracted_total: row.get::<_, Option<String>>(14)?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawSummaryRow {
    pub company_id: String,
    pub legal_name: String,
    pub status: String,
    pub score: i64,
    pub alert_count: i64,
    pub max_severity: Option<String>,
    pub contract_count: i64,
    pub contracted_total: Option<String>,
}

impl RawSummaryRow {
    pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            company_id: row.get::<_, String>(0)?,
            legal_name: row.get::<_, String>(1)?,
            status: row.get::<_, String>(2)?,
            score: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
            alert_count: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
            max_severity: row.get::<_, Option<String>>(5)?,
            contract_count: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
            contracted_total: row.get::<_, Option<String>>(7)?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawContractRow {
    pub org_code: String,
    pub value: String,
    pub subject: Option<String>,
    pub tender_number: Option<String>,
    pub signed_on: Option<String>,
    pub valid_until: Option<String>,
}

impl RawContractRow {
    pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            org_code: row.get::<_, String>(0)?,
            value: row.get::<_, String>(1)?,
            subject: row.get::<_, Option<String>>(2)?,
            tender_number: row.get::<_, Option<String>>(3)?,
            signed_on: row.get::<_, Option<String>>(4)?,
            valid_until: row.get::<_, Option<String>>(5)?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RawPartnerRow {
    pub person_hash: String,
    pub name: String,
    pub qualification: Option<String>,
    pub is_public_servant: bool,
    pub employing_body: Option<String>,
    pub is_sanctioned: bool,
    pub gov_supplier_count: i64,
    pub birth_year: Option<i64>,
    pub entered_on: Option<String>,
    pub left_on: Option<String>,
    pub capital_share: Option<String>,
}

impl RawPartnerRow {
    pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            person_hash: row.get::<_, String>(0)?,
            name: row.get::<_, String>(1)?,
            qualification: row.get::<_, Option<String>>(2)?,
            is_public_servant: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
            employing_body: row.get::<_, Option<String>>(4)?,
            is_sanctioned: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
            gov_supplier_count: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
            birth_year: row.get::<_, Option<i64>>(7)?,
            entered_on: row.get::<_, Option<String>>(8)?,
            left_on: row.get::<_, Option<String>>(9)?,
            capital_share: row.get::<_, Option<String>>(10)?,
        })
    }
}

pub(crate) fn decode_date(raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| StoreError::Decode(format!("bad date {raw}: {err}")))
}

pub(crate) fn decode_date_opt(raw: Option<&str>) -> Result<Option<NaiveDate>, StoreError> {
    raw.map(decode_date).transpose()
}

pub(crate) fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| StoreError::Decode(format!("bad timestamp {raw}: {err}")))
}

pub(crate) fn decode_money(raw: &str) -> Result<Money, StoreError> {
    Money::parse(raw).map_err(|err| StoreError::Decode(format!("bad amount {raw}: {err}")))
}

pub(crate) fn decode_money_opt(raw: Option<&str>) -> Result<Money, StoreError> {
    raw.map_or_else(|| Ok(Money::zero()), decode_money)
}
