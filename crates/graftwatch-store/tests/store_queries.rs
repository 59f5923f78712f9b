use graftwatch_model::{AlertKind, CompanyId, GovOrgCode, Severity};
use graftwatch_store::fixture::{
    company_id, empty_store, insert_alert, insert_contract, insert_org, insert_partner,
    insert_supplier, person_hash,
};
use graftwatch_store::{
    AlertFeedReader, ContractFilter, ContractReader, DonationReader, OrgDashboardReader,
    PartnerReader, SanctionReader, SqliteStore, StatsReader, SupplierReader,
};
use rusqlite::params;

fn id(seed: u32) -> CompanyId {
    CompanyId::parse(&company_id(seed)).expect("fixture company id")
}

#[tokio::test]
async fn supplier_lookup_hydrates_the_aggregate() {
    let conn = empty_store();
    conn.execute(
        "INSERT INTO dim_supplier (pk_supplier, company_id, legal_name, status, opened_on, \
         capital, activity_code, street, city, state, postal_code, shared_address_count, \
         employee_count, contract_count, contracted_total) \
         VALUES (1, ?1, 'ACME SERVICES LTDA', 'ACTIVE', '2020-05-01', '150000.00', '6201-5', \
         'MAIN ST 10', 'CAPITAL CITY', 'CC', '01000-000', 2, 0, 3, '900000.00')",
        params![company_id(1)],
    )
    .expect("insert");
    let store = SqliteStore::from_connection(conn);

    let supplier = store
        .supplier_by_id(&id(1))
        .await
        .expect("query")
        .expect("found");
    assert_eq!(supplier.legal_name, "ACME SERVICES LTDA");
    assert_eq!(supplier.shared_address_count, 2);
    assert_eq!(supplier.employee_count, Some(0));
    assert_eq!(supplier.capital.expect("capital").canonical_string(), "150000.00");
    assert_eq!(
        supplier.address.expect("address").street,
        "MAIN ST 10"
    );

    assert!(store
        .supplier_by_id(&id(999))
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn ranking_orders_by_score_then_contracted_value() {
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "LOW SCORE", 10);
    insert_supplier(&conn, 2, &company_id(2), "HIGH SCORE SMALL", 80);
    insert_supplier(&conn, 3, &company_id(3), "HIGH SCORE BIG", 80);
    conn.execute(
        "UPDATE dim_supplier SET contracted_total = '1000.00' WHERE pk_supplier = 2",
        [],
    )
    .expect("update");
    conn.execute(
        "UPDATE dim_supplier SET contracted_total = '90000.00' WHERE pk_supplier = 3",
        [],
    )
    .expect("update");
    let store = SqliteStore::from_connection(conn);

    let rows = store.rank_by_score(10, 0).await.expect("rank");
    let names: Vec<&str> = rows.iter().map(|r| r.legal_name.as_str()).collect();
    assert_eq!(names, vec!["HIGH SCORE BIG", "HIGH SCORE SMALL", "LOW SCORE"]);

    let paged = store.rank_by_score(1, 1).await.expect("rank");
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].legal_name, "HIGH SCORE SMALL");
}

#[tokio::test]
async fn search_prefers_identifier_prefix_then_falls_back_to_name() {
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(42), "NORTHERN SUPPLIES", 5);
    insert_supplier(&conn, 2, &company_id(43), "southern trading 777", 7);
    let store = SqliteStore::from_connection(conn);

    // Full identifier with punctuation resolves by prefix.
    let raw = company_id(42);
    let formatted = format!(
        "{}.{}.{}/{}-{}",
        &raw[0..2],
        &raw[2..5],
        &raw[5..8],
        &raw[8..12],
        &raw[12..14]
    );
    let rows = store
        .search_by_name_or_id(&formatted, 10)
        .await
        .expect("search");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].legal_name, "NORTHERN SUPPLIES");

    // Case-folded substring on the legal name.
    let rows = store
        .search_by_name_or_id("SOUTHERN", 10)
        .await
        .expect("search");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].legal_name, "southern trading 777");

    // Digits that match no identifier still fall back to the name match.
    let rows = store
        .search_by_name_or_id("777", 10)
        .await
        .expect("search");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].legal_name, "southern trading 777");

    // LIKE wildcards are data, not pattern syntax.
    assert!(store
        .search_by_name_or_id("%", 10)
        .await
        .expect("search")
        .is_empty());
}

#[tokio::test]
async fn contract_filters_compose() {
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "ALPHA", 0);
    insert_supplier(&conn, 2, &company_id(2), "BETA", 0);
    insert_org(&conn, 1, "26000", "EDUCATION DEPT");
    insert_org(&conn, 2, "30000", "HEALTH DEPT");
    insert_contract(&conn, 1, 1, 1, "1000.00", Some("2024-01-01"));
    insert_contract(&conn, 2, 1, 2, "2000.00", Some("2024-02-01"));
    insert_contract(&conn, 3, 2, 1, "3000.00", Some("2024-03-01"));
    let store = SqliteStore::from_connection(conn);

    let all = store
        .contracts(&ContractFilter::default(), 10, 0)
        .await
        .expect("contracts");
    assert_eq!(all.len(), 3);

    let filter = ContractFilter {
        supplier: Some(id(1)),
        org_code: Some(GovOrgCode::parse("26000").expect("org")),
    };
    let filtered = store.contracts(&filter, 10, 0).await.expect("contracts");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].value.canonical_string(), "1000.00");

    let of_supplier = store.contracts_of(&id(1)).await.expect("contracts");
    assert_eq!(of_supplier.len(), 2);
}

#[tokio::test]
async fn sanctions_partners_and_donations_hydrate() {
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "ALPHA", 0);
    conn.execute(
        "INSERT INTO dim_sanction (pk_sanction, fk_supplier, kind, sanctioning_body, reason, \
         starts_on, ends_on) VALUES (1, 1, 'CEIS', 'COMPTROLLER', 'bid fraud', '2024-01-01', NULL)",
        [],
    )
    .expect("sanction");
    insert_partner(&conn, 1, &person_hash(7), "JANE PARTNER");
    conn.execute(
        "UPDATE dim_partner SET is_public_servant = 1, gov_supplier_count = 4, birth_year = 1990 \
         WHERE pk_partner = 1",
        [],
    )
    .expect("partner flags");
    conn.execute(
        "INSERT INTO bridge_supplier_partner (fk_supplier, fk_partner, qualification, \
         entered_on, capital_share) VALUES (1, 1, 'managing partner', '2020-01-01', '51.5')",
        [],
    )
    .expect("bridge");
    conn.execute(
        "INSERT INTO dim_candidate (pk_candidate, name, party, office) \
         VALUES (1, 'CANDIDATE X', 'PARTY', 'MAYOR')",
        [],
    )
    .expect("candidate");
    conn.execute(
        "INSERT INTO fact_donation (pk_donation, fk_supplier, fk_partner, fk_candidate, amount, \
         election_year, linked_org_code) VALUES (1, 1, NULL, 1, '15000.00', 2024, '26000')",
        [],
    )
    .expect("donation");
    let store = SqliteStore::from_connection(conn);

    let sanctions = store.sanctions_for(&id(1)).await.expect("sanctions");
    assert_eq!(sanctions.len(), 1);
    assert!(sanctions[0].ends_on.is_none());

    let links = store.partners_of(&id(1)).await.expect("partners");
    assert_eq!(links.len(), 1);
    let link = &links[0];
    assert!(link.partner.is_public_servant);
    assert_eq!(link.partner.gov_supplier_count, 4);
    assert_eq!(link.partner.birth_year, Some(1990));
    assert_eq!(link.partner.qualification.as_deref(), Some("managing partner"));
    assert_eq!(link.capital_share.expect("share").percent().to_string(), "51.5");

    let donations = store.donations_for(&id(1)).await.expect("donations");
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0].candidate.name, "CANDIDATE X");
    assert_eq!(
        donations[0].linked_org.as_ref().expect("org").as_str(),
        "26000"
    );
}

#[tokio::test]
async fn alert_feed_is_newest_first_and_filters_by_kind() {
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "ALPHA", 0);
    insert_alert(
        &conn,
        1,
        1,
        "STRAWMAN",
        "CRITICAL",
        "2024-01-01T00:00:00+00:00",
    );
    insert_alert(
        &conn,
        2,
        1,
        "PARTNER_IS_PUBLIC_SERVANT",
        "CRITICAL",
        "2024-06-01T00:00:00+00:00",
    );
    insert_alert(
        &conn,
        3,
        1,
        "PARTNER_SANCTIONED_ELSEWHERE",
        "SEVERE",
        "2024-03-01T00:00:00+00:00",
    );
    let store = SqliteStore::from_connection(conn);

    let feed = store.alert_feed(10, 0).await.expect("feed");
    let kinds: Vec<AlertKind> = feed.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            AlertKind::PartnerIsPublicServant,
            AlertKind::PartnerSanctionedElsewhere,
            AlertKind::Strawman,
        ]
    );
    assert_eq!(feed[0].severity, Severity::Critical);

    let only = store
        .alert_feed_by_kind(AlertKind::Strawman, 10, 0)
        .await
        .expect("feed");
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].kind, AlertKind::Strawman);
}

#[tokio::test]
async fn stats_and_org_dashboard_aggregate() {
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "ALPHA", 40);
    insert_supplier(&conn, 2, &company_id(2), "BETA", 10);
    insert_org(&conn, 1, "26000", "EDUCATION DEPT");
    insert_contract(&conn, 1, 1, 1, "100.10", Some("2024-01-01"));
    insert_contract(&conn, 2, 1, 1, "0.20", Some("2024-02-01"));
    insert_contract(&conn, 3, 2, 1, "50.00", Some("2024-03-01"));
    conn.execute(
        "INSERT INTO meta_source (source, last_update, row_count) \
         VALUES ('procurement', '2025-05-01', 3)",
        [],
    )
    .expect("meta");
    let store = SqliteStore::from_connection(conn);

    let stats = store.stats_rollup().await.expect("stats");
    assert_eq!(stats.total_suppliers, 2);
    assert_eq!(stats.total_contracts, 3);
    assert_eq!(stats.sources.len(), 1);
    assert_eq!(stats.sources[0].source, "procurement");

    let dashboard = store
        .org_dashboard(&GovOrgCode::parse("26000").expect("org"))
        .await
        .expect("query")
        .expect("found");
    assert_eq!(dashboard.contract_count, 3);
    assert_eq!(dashboard.supplier_count, 2);
    assert_eq!(dashboard.contracted_total.canonical_string(), "150.30");
    assert_eq!(dashboard.top_suppliers.len(), 2);
    assert_eq!(dashboard.top_suppliers[0].legal_name, "ALPHA");
    assert_eq!(
        dashboard.top_suppliers[0].contracted_total.canonical_string(),
        "100.30"
    );

    assert!(store
        .org_dashboard(&GovOrgCode::parse("99999").expect("org"))
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn count_suppliers_counts() {
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "ALPHA", 0);
    insert_supplier(&conn, 2, &company_id(2), "BETA", 0);
    let store = SqliteStore::from_connection(conn);
    assert_eq!(store.count_suppliers().await.expect("count"), 2);
}
