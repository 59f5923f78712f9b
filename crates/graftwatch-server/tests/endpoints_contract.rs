use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use graftwatch_api::{Dossier, GraphView, Stats, SupplierSummary};
use graftwatch_server::{ApiConfig, AppState};
use graftwatch_store::fixture::{
    company_id, empty_store, insert_alert, insert_contract, insert_org, insert_partner,
    insert_supplier, link_partner, person_hash,
};
use graftwatch_store::SqliteStore;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tower::ServiceExt;

/// One supplier with a public-servant partner, small contracts with two
/// different bodies, high declared capital: exactly one critical alert and
/// a zero score.
fn seed_fixture(conn: &Connection) {
    conn.execute(
        "INSERT INTO dim_supplier (pk_supplier, company_id, legal_name, status, capital, \
         risk_score, alert_count, max_severity, contract_count, contracted_total) \
         VALUES (1, ?1, 'ACME LTDA', 'ACTIVE', '1000000.00', 35, 1, 'CRITICAL', 2, '80000.00')",
        params![company_id(1)],
    )
    .expect("supplier");
    insert_supplier(conn, 2, &company_id(2), "OTHER SUPPLIES", 80);
    insert_org(conn, 1, "26000", "EDUCATION DEPT");
    insert_org(conn, 2, "30000", "HEALTH DEPT");
    insert_contract(conn, 1, 1, 1, "50000.00", Some("2024-06-15"));
    insert_contract(conn, 2, 1, 2, "30000.00", Some("2024-09-01"));
    insert_partner(conn, 1, &person_hash(1), "JOHN SERVANT");
    conn.execute(
        "UPDATE dim_partner SET is_public_servant = 1, employing_body = 'MINISTRY' \
         WHERE pk_partner = 1",
        [],
    )
    .expect("flag partner");
    link_partner(conn, 1, 1);
    insert_alert(
        conn,
        1,
        1,
        "PARTNER_IS_PUBLIC_SERVANT",
        "CRITICAL",
        "2025-01-01T00:00:00+00:00",
    );
    conn.execute(
        "INSERT INTO meta_source (source, last_update, row_count) \
         VALUES ('procurement', '2025-05-01', 1)",
        [],
    )
    .expect("meta");
}

fn app_with(api: ApiConfig) -> Router {
    let conn = empty_store();
    seed_fixture(&conn);
    let store = Arc::new(SqliteStore::from_connection(conn));
    graftwatch_server::build_router(AppState::from_store(store, api))
}

fn app() -> Router {
    app_with(ApiConfig {
        rate_limit_per_window: 0,
        ..ApiConfig::default()
    })
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, body.to_vec())
}

#[tokio::test]
async fn healthz_answers() {
    let (status, body) = get(&app(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, br#"{"status":"ok"}"#);
}

#[tokio::test]
async fn dossier_has_alerts_and_score_from_the_rule_engine() {
    let (status, body) = get(&app(), &format!("/api/suppliers/{}", company_id(1))).await;
    assert_eq!(status, StatusCode::OK);
    let dossier: Dossier = serde_json::from_slice(&body).expect("dossier");
    assert_eq!(dossier.legal_name, "ACME LTDA");
    assert_eq!(dossier.alerts.len(), 1);
    assert_eq!(dossier.alerts[0].kind, "PARTNER_IS_PUBLIC_SERVANT");
    assert_eq!(dossier.alerts[0].severity, "CRITICAL");
    assert_eq!(dossier.score.total, 0);
    assert_eq!(dossier.score.band, "Low");
    assert!(!dossier.disclaimer.is_empty());

    // Wire round trip is identity.
    let reencoded = serde_json::to_vec(&dossier).expect("encode");
    let decoded: Dossier = serde_json::from_slice(&reencoded).expect("decode");
    assert_eq!(decoded, dossier);
}

#[tokio::test]
async fn supplier_id_validation_and_absence() {
    // Formatted identifier is accepted.
    let raw = company_id(1);
    let formatted = format!(
        "{}.{}.{}/{}-{}",
        &raw[0..2],
        &raw[2..5],
        &raw[5..8],
        &raw[8..12],
        &raw[12..14]
    );
    let (status, _) = get(&app(), &format!("/api/suppliers/{formatted}")).await;
    assert_eq!(status, StatusCode::OK);

    // Checksum failure is 422 with an opaque single-line detail.
    let (status, body) = get(&app(), "/api/suppliers/11144477700062").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let err: serde_json::Value = serde_json::from_slice(&body).expect("error body");
    assert_eq!(err["code"], "input_invalid");
    assert!(!err["detail"].as_str().expect("detail").contains('\n'));

    // Valid but unknown identifier is 404.
    let (status, _) = get(&app(), &format!("/api/suppliers/{}", company_id(777))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ranking_is_not_shadowed_by_the_id_capture() {
    let (status, body) = get(&app(), "/api/suppliers/ranking").await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<SupplierSummary> = serde_json::from_slice(&body).expect("summaries");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].legal_name, "OTHER SUPPLIES");
    assert_eq!(rows[0].band, "Critical");
}

#[tokio::test]
async fn ranking_rejects_out_of_range_paging() {
    let (status, _) = get(&app(), "/api/suppliers/ranking?limit=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = get(&app(), "/api/suppliers/ranking?limit=101").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = get(&app(), "/api/suppliers/ranking?offset=-1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn graph_endpoint_projects_typed_nodes_and_edges() {
    let (status, body) = get(&app(), &format!("/api/suppliers/{}/graph", company_id(1))).await;
    assert_eq!(status, StatusCode::OK);
    let graph: GraphView = serde_json::from_slice(&body).expect("graph");
    assert_eq!(graph.nodes.len(), 2);
    assert!(graph.nodes.iter().any(|n| n.kind == "company"));
    assert!(graph.nodes.iter().any(|n| n.kind == "person"));
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].kind, "owns-share-of");
    assert!(!graph.truncated);

    let (status, _) = get(&app(), &format!("/api/suppliers/{}/graph", company_id(777))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_formats() {
    let router = app();
    let base = format!("/api/suppliers/{}", company_id(1));

    let (status, body) = get(&router, &format!("{base}/export?format=json")).await;
    assert_eq!(status, StatusCode::OK);
    let dossier: Dossier = serde_json::from_slice(&body).expect("dossier json");
    assert_eq!(dossier.company_id, company_id(1));

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("{base}/export?format=csv"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .expect("content type"),
        "text/csv"
    );
    assert!(response
        .headers()
        .get("content-disposition")
        .expect("disposition")
        .to_str()
        .expect("ascii")
        .contains(".csv"));
    let csv = String::from_utf8(
        to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec(),
    )
    .expect("utf8");
    for section in [
        "# CADASTRAL",
        "# CONTRACTS",
        "# PARTNERS",
        "# SANCTIONS",
        "# DONATIONS",
        "# ALERTS",
    ] {
        assert_eq!(csv.matches(section).count(), 1, "{section}");
    }

    let (status, _) = get(&router, &format!("{base}/export?format=pdf")).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

    let (status, _) = get(&router, &format!("{base}/export?format=xml")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = get(&router, &format!("{base}/export")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn alert_feed_and_kind_filter() {
    let router = app();
    let (status, body) = get(&router, "/api/alerts").await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&body).expect("feed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["kind"], "PARTNER_IS_PUBLIC_SERVANT");

    let (status, _) = get(&router, "/api/alerts/PARTNER_IS_PUBLIC_SERVANT").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&router, "/api/alerts/NOT_A_KIND").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn search_validates_query_length() {
    let router = app();
    let (status, body) = get(&router, "/api/search?q=ACME").await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<SupplierSummary> = serde_json::from_slice(&body).expect("rows");
    assert_eq!(rows.len(), 1);

    // A single character is a valid term.
    let (status, body) = get(&router, "/api/search?q=a").await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<SupplierSummary> = serde_json::from_slice(&body).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].legal_name, "ACME LTDA");

    let (status, _) = get(&router, "/api/search?q=").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = get(&router, "/api/search").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn contracts_endpoint_filters() {
    let router = app();
    let (status, body) = get(
        &router,
        &format!("/api/contracts?id={}&orgCode=26000", company_id(1)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&body).expect("contracts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["value"], "50000.00");

    let (status, _) = get(&router, "/api/contracts?id=123").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn org_dashboard_and_stats() {
    let router = app();
    let (status, body) = get(&router, "/api/orgs/26000/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let dashboard: serde_json::Value = serde_json::from_slice(&body).expect("dashboard");
    assert_eq!(dashboard["org"]["code"], "26000");
    assert_eq!(dashboard["contract_count"], 1);

    let (status, _) = get(&router, "/api/orgs/99999/dashboard").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&router, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    let stats: Stats = serde_json::from_slice(&body).expect("stats");
    assert_eq!(stats.total_suppliers, 2);
    assert!(stats.sources.contains_key("procurement"));
}

#[tokio::test]
async fn every_response_carries_security_headers() {
    let router = app();
    for uri in ["/healthz", "/api/stats", "/api/suppliers/bogus"] {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let headers = response.headers();
        assert_eq!(
            headers.get("x-content-type-options").expect("nosniff"),
            "nosniff"
        );
        assert_eq!(headers.get("x-frame-options").expect("deny"), "DENY");
        assert_eq!(
            headers.get("referrer-policy").expect("referrer"),
            "strict-origin-when-cross-origin"
        );
    }
}

#[tokio::test]
async fn cors_echoes_only_allow_listed_origins() {
    let router = app_with(ApiConfig {
        rate_limit_per_window: 0,
        cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        ..ApiConfig::default()
    });

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .expect("cors"),
        "http://localhost:5173"
    );

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .header("origin", "http://evil.example")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn rate_limit_caps_and_bypass_key_disables_it() {
    let router = app_with(ApiConfig {
        rate_limit_per_window: 60,
        ..ApiConfig::default()
    });

    for n in 0..60 {
        let (status, _) = get(&router, "/healthz").await;
        assert_eq!(status, StatusCode::OK, "request {n} should pass");
    }
    let (status, _) = get(&router, "/healthz").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // A non-empty opaque key header bypasses the limiter entirely.
    for n in 0..120 {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .header("x-api-key", "opaque-bypass")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "bypassed request {n}");
    }

    // The limited client is still limited afterwards.
    let (status, _) = get(&router, "/healthz").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn zero_cap_disables_the_limiter() {
    let router = app_with(ApiConfig {
        rate_limit_per_window: 0,
        ..ApiConfig::default()
    });
    for _ in 0..70 {
        let (status, _) = get(&router, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
    }
}
