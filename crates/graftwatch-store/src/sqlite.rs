use crate::contracts::{
    AlertFeedReader, AlertFeedRow, ContractFilter, ContractReader, DonationReader,
    OrgDashboard, OrgDashboardReader, OrgSummary, OrgTopSupplier, PartnerReader,
    RelatedSupplierRow, RelatedViewReader, SanctionReader, SourceFreshness, StatsReader,
    StatsRollup, SupplierReader, SupplierSummaryRow,
};
use crate::error::StoreError;
use crate::row_decode::{
    decode_date, decode_date_opt, decode_money, decode_money_opt, decode_timestamp,
    RawContractRow, RawPartnerRow, RawSummaryRow, RawSupplierRow,
};
use async_trait::async_trait;
use graftwatch_model::{
    ActivityCode, Address, AlertKind, CadastralStatus, Candidate, CompanyId, Contract, Donation,
    GovOrgCode, Money, OwnershipLink, Partner, PersonHash, RiskBand, Sanction, SanctionKind,
    Severity, Share, Supplier, TenderNumber,
};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::path::Path;
use tokio::sync::Mutex;

/// Read-only adapter over the analytical SQLite file. One connection per
/// process, opened during initialization and shared across workers; each
/// query takes a short-lived cached prepared statement that is released on
/// every exit path when the statement handle drops.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open_read_only(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| StoreError::Open(format!("{}: {err}", path.display())))?;
        tracing::info!(path = %path.display(), "opened analytical store read-only");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Test seam: wrap an already-open (usually in-memory) connection.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub(crate) fn connection(&self) -> &Mutex<Connection> {
        &self.conn
    }
}

const SUMMARY_COLUMNS: &str = "company_id, legal_name, status, risk_score, alert_count, \
     max_severity, contract_count, contracted_total";

fn hydrate_summary(raw: RawSummaryRow) -> Result<SupplierSummaryRow, StoreError> {
    let score = u8::try_from(raw.score.clamp(0, 100))
        .map_err(|_| StoreError::Decode("risk score out of range".to_string()))?;
    let max_severity = raw
        .max_severity
        .as_deref()
        .map(Severity::parse)
        .transpose()?;
    Ok(SupplierSummaryRow {
        company_id: CompanyId::parse(&raw.company_id)?,
        legal_name: raw.legal_name,
        status: raw.status,
        score,
        band: RiskBand::from_total(score),
        alert_count: u32::try_from(raw.alert_count.max(0)).unwrap_or(u32::MAX),
        max_severity,
        contract_count: u64::try_from(raw.contract_count.max(0)).unwrap_or(0),
        contracted_total: decode_money_opt(raw.contracted_total.as_deref())?,
    })
}

fn hydrate_supplier(raw: RawSupplierRow) -> Result<Supplier, StoreError> {
    let address = raw.street.as_ref().map(|street| Address {
        street: street.clone(),
        city: raw.city.clone().unwrap_or_default(),
        state: raw.state.clone().unwrap_or_default(),
        postal_code: raw.postal_code.clone().unwrap_or_default(),
    });
    Ok(Supplier {
        company_id: CompanyId::parse(&raw.company_id)?,
        legal_name: raw.legal_name,
        status: CadastralStatus::parse(&raw.status)?,
        opened_on: decode_date_opt(raw.opened_on.as_deref())?,
        capital: raw.capital.as_deref().map(decode_money).transpose()?,
        activity_code: raw
            .activity_code
            .as_deref()
            .map(ActivityCode::parse)
            .transpose()?,
        activity_desc: raw.activity_desc,
        address,
        shared_address_count: u32::try_from(raw.shared_address_count.max(0)).unwrap_or(0),
        employee_count: raw
            .employee_count
            .map(|n| u32::try_from(n.max(0)).unwrap_or(0)),
        contract_count: u64::try_from(raw.contract_count.max(0)).unwrap_or(0),
        contracted_total: decode_money_opt(raw.contracted_total.as_deref())?,
    })
}

fn hydrate_contract(raw: RawContractRow) -> Result<Contract, StoreError> {
    Ok(Contract {
        org_code: GovOrgCode::parse(&raw.org_code)?,
        value: decode_money(&raw.value)?,
        subject: raw.subject,
        tender_number: raw
            .tender_number
            .as_deref()
            .map(TenderNumber::parse)
            .transpose()?,
        signed_on: decode_date_opt(raw.signed_on.as_deref())?,
        valid_until: decode_date_opt(raw.valid_until.as_deref())?,
    })
}

fn hydrate_link(raw: RawPartnerRow) -> Result<OwnershipLink, StoreError> {
    Ok(OwnershipLink {
        partner: Partner {
            person_hash: PersonHash::parse(&raw.person_hash)?,
            name: raw.name,
            qualification: raw.qualification,
            is_public_servant: raw.is_public_servant,
            employing_body: raw.employing_body,
            is_sanctioned: raw.is_sanctioned,
            gov_supplier_count: u32::try_from(raw.gov_supplier_count.max(0)).unwrap_or(0),
            birth_year: raw.birth_year.map(|y| y as i32),
        },
        entered_on: decode_date_opt(raw.entered_on.as_deref())?,
        left_on: decode_date_opt(raw.left_on.as_deref())?,
        capital_share: raw
            .capital_share
            .as_deref()
            .map(Share::parse)
            .transpose()?,
    })
}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern with
/// `ESCAPE '!'`.
fn escape_like(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '!') {
            out.push('!');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl SupplierReader for SqliteStore {
    async fn supplier_by_id(&self, id: &CompanyId) -> Result<Option<Supplier>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(
                "SELECT company_id, legal_name, status, opened_on, capital, activity_code, \
                 activity_desc, street, city, state, postal_code, shared_address_count, \
                 employee_count, contract_count, contracted_total \
                 FROM dim_supplier WHERE company_id = ?1",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let mut rows = stmt.query([id.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(hydrate_supplier(RawSupplierRow::from_sql_row(row)?)?)),
            None => Ok(None),
        }
    }

    async fn rank_by_score(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SupplierSummaryRow>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT {SUMMARY_COLUMNS} FROM dim_supplier \
                 ORDER BY risk_score DESC, CAST(contracted_total AS REAL) DESC, company_id ASC \
                 LIMIT ?1 OFFSET ?2"
            ))
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let raw = stmt
            .query_map([limit, offset], RawSummaryRow::from_sql_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter().map(hydrate_summary).collect()
    }

    async fn search_by_name_or_id(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<SupplierSummaryRow>, StoreError> {
        let digits = graftwatch_model::strip_id_punctuation(query.trim());
        let conn = self.conn.lock().await;
        // Digits-only input is an identifier prefix lookup first; anything
        // else is a case-folded substring match on the legal name.
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let mut stmt = conn
                .prepare_cached(&format!(
                    "SELECT {SUMMARY_COLUMNS} FROM dim_supplier \
                     WHERE company_id LIKE ?1 ESCAPE '!' \
                     ORDER BY company_id ASC LIMIT ?2"
                ))
                .map_err(|err| StoreError::Prepare(err.to_string()))?;
            let pattern = format!("{}%", escape_like(&digits));
            let raw = stmt
                .query_map(rusqlite::params![pattern, limit], RawSummaryRow::from_sql_row)?
                .collect::<Result<Vec<_>, _>>()?;
            let rows: Vec<SupplierSummaryRow> = raw
                .into_iter()
                .map(hydrate_summary)
                .collect::<Result<_, _>>()?;
            if !rows.is_empty() {
                return Ok(rows);
            }
        }
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT {SUMMARY_COLUMNS} FROM dim_supplier \
                 WHERE legal_name LIKE ?1 ESCAPE '!' COLLATE NOCASE \
                 ORDER BY legal_name ASC LIMIT ?2"
            ))
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let pattern = format!("%{}%", escape_like(query.trim()));
        let raw = stmt
            .query_map(rusqlite::params![pattern, limit], RawSummaryRow::from_sql_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter().map(hydrate_summary).collect()
    }

    async fn count_suppliers(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached("SELECT count(*) FROM dim_supplier")
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let count = stmt.query_row([], |row| row.get::<_, i64>(0))?;
        Ok(count)
    }
}

#[async_trait]
impl ContractReader for SqliteStore {
    async fn contracts(
        &self,
        filter: &ContractFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contract>, StoreError> {
        let mut sql = String::from(
            "SELECT o.org_code, c.value, c.subject, c.tender_number, c.signed_on, c.valid_until \
             FROM fact_contract c \
             JOIN dim_org o ON c.fk_org = o.pk_org \
             JOIN dim_supplier s ON c.fk_supplier = s.pk_supplier",
        );
        let mut where_parts: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(id) = &filter.supplier {
            where_parts.push("s.company_id = ?");
            params.push(Value::Text(id.as_str().to_string()));
        }
        if let Some(org) = &filter.org_code {
            where_parts.push("o.org_code = ?");
            params.push(Value::Text(org.as_str().to_string()));
        }
        if !where_parts.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_parts.join(" AND "));
        }
        sql.push_str(" ORDER BY c.signed_on DESC, c.pk_contract ASC LIMIT ? OFFSET ?");
        params.push(Value::Integer(limit));
        params.push(Value::Integer(offset));

        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let raw = stmt
            .query_map(params_from_iter(params), RawContractRow::from_sql_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter().map(hydrate_contract).collect()
    }

    async fn contracts_of(&self, id: &CompanyId) -> Result<Vec<Contract>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(
                "SELECT o.org_code, c.value, c.subject, c.tender_number, c.signed_on, \
                 c.valid_until \
                 FROM fact_contract c \
                 JOIN dim_org o ON c.fk_org = o.pk_org \
                 JOIN dim_supplier s ON c.fk_supplier = s.pk_supplier \
                 WHERE s.company_id = ?1 \
                 ORDER BY c.signed_on ASC, c.pk_contract ASC",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let raw = stmt
            .query_map([id.as_str()], RawContractRow::from_sql_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter().map(hydrate_contract).collect()
    }
}

#[async_trait]
impl SanctionReader for SqliteStore {
    async fn sanctions_for(&self, id: &CompanyId) -> Result<Vec<Sanction>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(
                "SELECT d.kind, d.sanctioning_body, d.reason, d.starts_on, d.ends_on \
                 FROM dim_sanction d \
                 JOIN dim_supplier s ON d.fk_supplier = s.pk_supplier \
                 WHERE s.company_id = ?1 \
                 ORDER BY d.starts_on ASC",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let rows = stmt
            .query_map([id.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(kind, body, reason, starts, ends)| {
                Sanction::new(
                    SanctionKind::parse(&kind)?,
                    body.unwrap_or_default(),
                    reason.unwrap_or_default(),
                    decode_date(&starts)?,
                    decode_date_opt(ends.as_deref())?,
                )
                .map_err(StoreError::from)
            })
            .collect()
    }
}

#[async_trait]
impl PartnerReader for SqliteStore {
    async fn partners_of(&self, id: &CompanyId) -> Result<Vec<OwnershipLink>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(
                "SELECT p.person_hash, p.name, b.qualification, p.is_public_servant, \
                 p.employing_body, p.is_sanctioned, p.gov_supplier_count, p.birth_year, \
                 b.entered_on, b.left_on, b.capital_share \
                 FROM dim_partner p \
                 JOIN bridge_supplier_partner b ON p.pk_partner = b.fk_partner \
                 JOIN dim_supplier s ON b.fk_supplier = s.pk_supplier \
                 WHERE s.company_id = ?1 \
                 ORDER BY p.name ASC",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let raw = stmt
            .query_map([id.as_str()], RawPartnerRow::from_sql_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter().map(hydrate_link).collect()
    }
}

#[async_trait]
impl DonationReader for SqliteStore {
    async fn donations_for(&self, id: &CompanyId) -> Result<Vec<Donation>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(
                "SELECT cand.name, cand.party, cand.office, d.amount, d.election_year, \
                 d.resource_type, d.linked_org_code, s.company_id, p.person_hash \
                 FROM fact_donation d \
                 JOIN dim_candidate cand ON d.fk_candidate = cand.pk_candidate \
                 LEFT JOIN dim_supplier s ON d.fk_supplier = s.pk_supplier \
                 LEFT JOIN dim_partner p ON d.fk_partner = p.pk_partner \
                 WHERE s.company_id = ?1 \
                    OR d.fk_partner IN ( \
                        SELECT b.fk_partner FROM bridge_supplier_partner b \
                        JOIN dim_supplier s2 ON b.fk_supplier = s2.pk_supplier \
                        WHERE s2.company_id = ?1) \
                 ORDER BY d.election_year DESC, d.pk_donation ASC",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let rows = stmt
            .query_map([id.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, Option<String>>(8)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(
                |(name, party, office, amount, year, resource, linked_org, supplier, hash)| {
                    Ok(Donation {
                        supplier: supplier.as_deref().map(CompanyId::parse).transpose()?,
                        partner_hash: hash.as_deref().map(PersonHash::parse).transpose()?,
                        candidate: Candidate {
                            name,
                            party,
                            office,
                        },
                        amount: decode_money(&amount)?,
                        election_year: year as i32,
                        resource_type: resource,
                        linked_org: linked_org.as_deref().map(GovOrgCode::parse).transpose()?,
                    })
                },
            )
            .collect()
    }
}

#[async_trait]
impl RelatedViewReader for SqliteStore {
    async fn related_suppliers(
        &self,
        id: &CompanyId,
    ) -> Result<Vec<RelatedSupplierRow>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(
                "SELECT s2.pk_supplier, s2.company_id, p.person_hash \
                 FROM dim_supplier s \
                 JOIN bridge_supplier_partner b1 ON b1.fk_supplier = s.pk_supplier \
                 JOIN bridge_supplier_partner b2 ON b2.fk_partner = b1.fk_partner \
                 JOIN dim_supplier s2 ON s2.pk_supplier = b2.fk_supplier \
                 JOIN dim_partner p ON p.pk_partner = b1.fk_partner \
                 WHERE s.company_id = ?1 AND s2.pk_supplier != s.pk_supplier",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let rows = stmt
            .query_map([id.as_str()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_pk: Vec<(i64, CompanyId, Vec<PersonHash>)> = Vec::new();
        for (pk, company_id, hash) in rows {
            let hash = PersonHash::parse(&hash)?;
            if let Some(entry) = by_pk.iter_mut().find(|(p, _, _)| *p == pk) {
                if !entry.2.contains(&hash) {
                    entry.2.push(hash);
                }
            } else {
                by_pk.push((pk, CompanyId::parse(&company_id)?, vec![hash]));
            }
        }

        let placeholders = vec!["?"; by_pk.len()].join(",");
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT fk_supplier, tender_number FROM fact_contract \
                 WHERE tender_number IS NOT NULL AND fk_supplier IN ({placeholders})"
            ))
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let pks: Vec<Value> = by_pk.iter().map(|(pk, _, _)| Value::Integer(*pk)).collect();
        let tender_rows = stmt
            .query_map(params_from_iter(pks), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(by_pk.len());
        for (pk, company_id, partner_hashes) in by_pk {
            let mut tender_numbers = Vec::new();
            for (fk, tender) in &tender_rows {
                if *fk == pk {
                    let t = TenderNumber::parse(tender)?;
                    if !tender_numbers.contains(&t) {
                        tender_numbers.push(t);
                    }
                }
            }
            out.push(RelatedSupplierRow {
                company_id,
                partner_hashes,
                tender_numbers,
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl AlertFeedReader for SqliteStore {
    async fn alert_feed(&self, limit: i64, offset: i64) -> Result<Vec<AlertFeedRow>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(
                "SELECT a.kind, a.severity, a.description, a.evidence, a.detected_at, \
                 s.company_id, s.legal_name, p.name \
                 FROM fact_alert a \
                 JOIN dim_supplier s ON a.fk_supplier = s.pk_supplier \
                 LEFT JOIN dim_partner p ON a.fk_partner = p.pk_partner \
                 ORDER BY a.detected_at DESC, a.pk_alert ASC \
                 LIMIT ?1 OFFSET ?2",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let rows = stmt
            .query_map([limit, offset], decode_feed_tuple)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(hydrate_feed_row).collect()
    }

    async fn alert_feed_by_kind(
        &self,
        kind: AlertKind,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertFeedRow>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(
                "SELECT a.kind, a.severity, a.description, a.evidence, a.detected_at, \
                 s.company_id, s.legal_name, p.name \
                 FROM fact_alert a \
                 JOIN dim_supplier s ON a.fk_supplier = s.pk_supplier \
                 LEFT JOIN dim_partner p ON a.fk_partner = p.pk_partner \
                 WHERE a.kind = ?1 \
                 ORDER BY a.detected_at DESC, a.pk_alert ASC \
                 LIMIT ?2 OFFSET ?3",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let rows = stmt
            .query_map(
                rusqlite::params![kind.as_str(), limit, offset],
                decode_feed_tuple,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(hydrate_feed_row).collect()
    }
}

type FeedTuple = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
);

fn decode_feed_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeedTuple> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn hydrate_feed_row(t: FeedTuple) -> Result<AlertFeedRow, StoreError> {
    let (kind, severity, description, evidence, detected_at, company_id, legal_name, partner) = t;
    Ok(AlertFeedRow {
        kind: AlertKind::parse(&kind)?,
        severity: Severity::parse(&severity)?,
        description,
        evidence,
        detected_at: decode_timestamp(&detected_at)?,
        company_id: CompanyId::parse(&company_id)?,
        legal_name,
        partner_name: partner,
    })
}

#[async_trait]
impl StatsReader for SqliteStore {
    async fn stats_rollup(&self) -> Result<StatsRollup, StoreError> {
        let conn = self.conn.lock().await;
        let count = |table: &str| -> Result<i64, StoreError> {
            // Table names come from this match, never from user input.
            let sql = match table {
                "dim_supplier" => "SELECT count(*) FROM dim_supplier",
                "fact_contract" => "SELECT count(*) FROM fact_contract",
                "fact_alert" => "SELECT count(*) FROM fact_alert",
                _ => return Err(StoreError::Prepare(format!("unknown table {table}"))),
            };
            let mut stmt = conn
                .prepare_cached(sql)
                .map_err(|err| StoreError::Prepare(err.to_string()))?;
            Ok(stmt.query_row([], |row| row.get::<_, i64>(0))?)
        };
        let total_suppliers = count("dim_supplier")?;
        let total_contracts = count("fact_contract")?;
        let total_alerts = count("fact_alert")?;

        let mut stmt = conn
            .prepare_cached(
                "SELECT source, last_update, row_count FROM meta_source ORDER BY source ASC",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let sources = stmt
            .query_map([], |row| {
                Ok(SourceFreshness {
                    source: row.get(0)?,
                    last_update: row.get(1)?,
                    row_count: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StatsRollup {
            total_suppliers,
            total_contracts,
            total_alerts,
            sources,
        })
    }
}

#[async_trait]
impl OrgDashboardReader for SqliteStore {
    async fn org_dashboard(&self, code: &GovOrgCode) -> Result<Option<OrgDashboard>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached("SELECT org_code, name, acronym FROM dim_org WHERE org_code = ?1")
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let mut rows = stmt.query([code.as_str()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let org = OrgSummary {
            code: GovOrgCode::parse(&row.get::<_, String>(0)?)?,
            name: row.get(1)?,
            acronym: row.get(2)?,
        };
        drop(rows);
        drop(stmt);

        let mut stmt = conn
            .prepare_cached(
                "SELECT count(*), COALESCE(sum(CAST(c.value AS REAL)), 0), \
                 count(DISTINCT c.fk_supplier) \
                 FROM fact_contract c \
                 JOIN dim_org o ON c.fk_org = o.pk_org \
                 WHERE o.org_code = ?1",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let (contract_count, supplier_count) = stmt.query_row([code.as_str()], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(2)?))
        })?;
        drop(stmt);

        // CAST AS REAL is used only to order the top-10 selection; the
        // returned totals are re-summed exactly from the decimal text below.
        let mut stmt = conn
            .prepare_cached(
                "SELECT s.company_id, s.legal_name, s.risk_score, \
                 sum(CAST(c.value AS REAL)) AS total, count(*) \
                 FROM fact_contract c \
                 JOIN dim_supplier s ON c.fk_supplier = s.pk_supplier \
                 JOIN dim_org o ON c.fk_org = o.pk_org \
                 WHERE o.org_code = ?1 \
                 GROUP BY s.pk_supplier, s.company_id, s.legal_name, s.risk_score \
                 ORDER BY total DESC, s.company_id ASC \
                 LIMIT 10",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let top_rows = stmt
            .query_map([code.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);

        let mut top_suppliers = Vec::with_capacity(top_rows.len());
        for (company_id, legal_name, score, count) in top_rows {
            let mut stmt = conn
                .prepare_cached(
                    "SELECT c.value FROM fact_contract c \
                     JOIN dim_supplier s ON c.fk_supplier = s.pk_supplier \
                     JOIN dim_org o ON c.fk_org = o.pk_org \
                     WHERE s.company_id = ?1 AND o.org_code = ?2",
                )
                .map_err(|err| StoreError::Prepare(err.to_string()))?;
            let values = stmt
                .query_map([company_id.as_str(), code.as_str()], |row| {
                    row.get::<_, String>(0)
                })?
                .collect::<Result<Vec<_>, _>>()?;
            let mut total = Money::zero();
            for v in &values {
                total = total + decode_money(v)?;
            }
            top_suppliers.push(OrgTopSupplier {
                company_id: CompanyId::parse(&company_id)?,
                legal_name,
                score: u8::try_from(score.clamp(0, 100)).unwrap_or(0),
                contracted_total: total,
                contract_count: count,
            });
        }

        let mut contracted_total = Money::zero();
        let mut stmt = conn
            .prepare_cached(
                "SELECT c.value FROM fact_contract c \
                 JOIN dim_org o ON c.fk_org = o.pk_org WHERE o.org_code = ?1",
            )
            .map_err(|err| StoreError::Prepare(err.to_string()))?;
        let values = stmt
            .query_map([code.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        for v in &values {
            contracted_total = contracted_total + decode_money(v)?;
        }

        Ok(Some(OrgDashboard {
            org,
            contract_count,
            contracted_total,
            supplier_count,
            top_suppliers,
        }))
    }
}
