//! In-memory fixture store for tests. Mirrors the schema contract the
//! ingestion pipeline produces; production code never writes any of this.

use rusqlite::{params, Connection};

pub const SCHEMA: &str = "
CREATE TABLE dim_supplier (
    pk_supplier INTEGER PRIMARY KEY,
    company_id TEXT NOT NULL UNIQUE,
    legal_name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    opened_on TEXT,
    capital TEXT,
    activity_code TEXT,
    activity_desc TEXT,
    street TEXT,
    city TEXT,
    state TEXT,
    postal_code TEXT,
    risk_score INTEGER DEFAULT 0,
    alert_count INTEGER DEFAULT 0,
    max_severity TEXT,
    contract_count INTEGER DEFAULT 0,
    contracted_total TEXT,
    shared_address_count INTEGER DEFAULT 0,
    employee_count INTEGER,
    updated_at TEXT
);
CREATE TABLE dim_org (
    pk_org INTEGER PRIMARY KEY,
    org_code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    acronym TEXT
);
CREATE TABLE dim_partner (
    pk_partner INTEGER PRIMARY KEY,
    person_hash TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    qualification TEXT,
    is_public_servant INTEGER DEFAULT 0,
    employing_body TEXT,
    is_sanctioned INTEGER DEFAULT 0,
    gov_supplier_count INTEGER DEFAULT 0,
    birth_year INTEGER
);
CREATE TABLE bridge_supplier_partner (
    fk_supplier INTEGER NOT NULL REFERENCES dim_supplier(pk_supplier),
    fk_partner INTEGER NOT NULL REFERENCES dim_partner(pk_partner),
    qualification TEXT,
    entered_on TEXT,
    left_on TEXT,
    capital_share TEXT
);
CREATE TABLE dim_sanction (
    pk_sanction INTEGER PRIMARY KEY,
    fk_supplier INTEGER NOT NULL REFERENCES dim_supplier(pk_supplier),
    kind TEXT NOT NULL,
    sanctioning_body TEXT,
    reason TEXT,
    starts_on TEXT NOT NULL,
    ends_on TEXT
);
CREATE TABLE dim_candidate (
    pk_candidate INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    party TEXT,
    office TEXT
);
CREATE TABLE fact_contract (
    pk_contract INTEGER PRIMARY KEY,
    fk_supplier INTEGER NOT NULL REFERENCES dim_supplier(pk_supplier),
    fk_org INTEGER NOT NULL REFERENCES dim_org(pk_org),
    value TEXT NOT NULL,
    subject TEXT,
    tender_number TEXT,
    signed_on TEXT,
    valid_until TEXT
);
CREATE TABLE fact_donation (
    pk_donation INTEGER PRIMARY KEY,
    fk_supplier INTEGER REFERENCES dim_supplier(pk_supplier),
    fk_partner INTEGER REFERENCES dim_partner(pk_partner),
    fk_candidate INTEGER NOT NULL REFERENCES dim_candidate(pk_candidate),
    amount TEXT NOT NULL,
    election_year INTEGER NOT NULL,
    resource_type TEXT,
    linked_org_code TEXT
);
CREATE TABLE fact_alert (
    pk_alert INTEGER PRIMARY KEY,
    fk_supplier INTEGER NOT NULL REFERENCES dim_supplier(pk_supplier),
    fk_partner INTEGER REFERENCES dim_partner(pk_partner),
    kind TEXT NOT NULL,
    severity TEXT NOT NULL,
    description TEXT NOT NULL,
    evidence TEXT NOT NULL,
    detected_at TEXT NOT NULL
);
CREATE TABLE fact_score_indicator (
    pk_indicator INTEGER PRIMARY KEY,
    fk_supplier INTEGER NOT NULL REFERENCES dim_supplier(pk_supplier),
    kind TEXT NOT NULL,
    weight INTEGER NOT NULL,
    description TEXT,
    evidence TEXT
);
CREATE TABLE meta_source (
    source TEXT PRIMARY KEY,
    last_update TEXT,
    row_count INTEGER DEFAULT 0
);
";

/// Fresh in-memory connection carrying the full analytical schema.
#[must_use]
pub fn empty_store() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory store");
    conn.execute_batch(SCHEMA).expect("create fixture schema");
    conn
}

pub fn insert_supplier(conn: &Connection, pk: i64, company_id: &str, legal_name: &str, score: i64) {
    conn.execute(
        "INSERT INTO dim_supplier (pk_supplier, company_id, legal_name, status, risk_score, \
         alert_count, contract_count, contracted_total) \
         VALUES (?1, ?2, ?3, 'ACTIVE', ?4, 0, 0, '0.00')",
        params![pk, company_id, legal_name, score],
    )
    .expect("insert supplier");
}

pub fn insert_org(conn: &Connection, pk: i64, org_code: &str, name: &str) {
    conn.execute(
        "INSERT INTO dim_org (pk_org, org_code, name, acronym) VALUES (?1, ?2, ?3, NULL)",
        params![pk, org_code, name],
    )
    .expect("insert org");
}

pub fn insert_partner(conn: &Connection, pk: i64, person_hash: &str, name: &str) {
    conn.execute(
        "INSERT INTO dim_partner (pk_partner, person_hash, name) VALUES (?1, ?2, ?3)",
        params![pk, person_hash, name],
    )
    .expect("insert partner");
}

pub fn link_partner(conn: &Connection, fk_supplier: i64, fk_partner: i64) {
    conn.execute(
        "INSERT INTO bridge_supplier_partner (fk_supplier, fk_partner) VALUES (?1, ?2)",
        params![fk_supplier, fk_partner],
    )
    .expect("link partner");
}

pub fn insert_contract(
    conn: &Connection,
    pk: i64,
    fk_supplier: i64,
    fk_org: i64,
    value: &str,
    signed_on: Option<&str>,
) {
    conn.execute(
        "INSERT INTO fact_contract (pk_contract, fk_supplier, fk_org, value, signed_on) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![pk, fk_supplier, fk_org, value, signed_on],
    )
    .expect("insert contract");
}

pub fn insert_alert(
    conn: &Connection,
    pk: i64,
    fk_supplier: i64,
    kind: &str,
    severity: &str,
    detected_at: &str,
) {
    conn.execute(
        "INSERT INTO fact_alert (pk_alert, fk_supplier, kind, severity, description, evidence, \
         detected_at) VALUES (?1, ?2, ?3, ?4, 'fixture alert', 'fixture=1', ?5)",
        params![pk, fk_supplier, kind, severity, detected_at],
    )
    .expect("insert alert");
}

/// Deterministic 64-char lowercase hex hash for fixtures.
#[must_use]
pub fn person_hash(seed: u8) -> String {
    format!("{seed:02x}").repeat(32)
}

/// Deterministic checksum-valid company id for fixtures.
#[must_use]
pub fn company_id(seed: u32) -> String {
    let base = format!("{:012}", 100_000_000_000_u64 + u64::from(seed));
    let d: Vec<u32> = base.bytes().map(|b| u32::from(b - b'0')).collect();
    const W1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const W2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let rem = (0..12).map(|i| d[i] * W1[i]).sum::<u32>() % 11;
    let d13 = if rem < 2 { 0 } else { 11 - rem };
    let rem = ((0..12).map(|i| d[i] * W2[i]).sum::<u32>() + d13 * W2[12]) % 11;
    let d14 = if rem < 2 { 0 } else { 11 - rem };
    format!("{base}{d13}{d14}")
}
