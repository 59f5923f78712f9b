#![forbid(unsafe_code)]
//! HTTP surface of the query service. Wiring is explicit: `AppState::from_store`
//! builds the repositories and services once, `build_router` registers the
//! routes and mounts the middleware stack.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use graftwatch_api::ApiError;
use graftwatch_store::SqliteStore;
use std::sync::Arc;
use tokio::time::timeout;

mod config;
mod http;
mod rate_limiter;
mod services;

pub use config::{
    load_startup_config, validate_startup_config, ApiConfig, RuntimeStartupConfig,
    DEFAULT_DISCLAIMER,
};
pub use services::{
    ContractsService, DossierService, FeedService, GraphService, OrgService, RankingService,
    SearchService, StatsService,
};

pub const CRATE_NAME: &str = "graftwatch-server";

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<ApiConfig>,
    pub(crate) dossier: Arc<DossierService>,
    pub(crate) ranking: Arc<RankingService>,
    pub(crate) search: Arc<SearchService>,
    pub(crate) feed: Arc<FeedService>,
    pub(crate) contracts: Arc<ContractsService>,
    pub(crate) graph: Arc<GraphService>,
    pub(crate) orgs: Arc<OrgService>,
    pub(crate) stats: Arc<StatsService>,
    pub(crate) limiter: Arc<rate_limiter::SlidingWindowLimiter>,
}

impl AppState {
    /// Single wiring point: one shared read-only store handle, each service
    /// receiving exactly the capabilities it consumes.
    #[must_use]
    pub fn from_store(store: Arc<SqliteStore>, api: ApiConfig) -> Self {
        let dossier = DossierService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            api.disclaimer.clone(),
            graftwatch_rules::StrawmanConfig::default(),
        );
        let graph = GraphService::new(store.clone(), api.graph_max_nodes);
        Self {
            api: Arc::new(api),
            dossier: Arc::new(dossier),
            ranking: Arc::new(RankingService::new(store.clone())),
            search: Arc::new(SearchService::new(store.clone())),
            feed: Arc::new(FeedService::new(store.clone())),
            contracts: Arc::new(ContractsService::new(store.clone())),
            graph: Arc::new(graph),
            orgs: Arc::new(OrgService::new(store.clone())),
            stats: Arc::new(StatsService::new(store)),
            limiter: Arc::new(rate_limiter::SlidingWindowLimiter::default()),
        }
    }
}

pub(crate) fn api_error_response(err: &ApiError) -> Response {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.clone())).into_response()
}

fn normalized_forwarded_for(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() || first.len() > 64 {
        return None;
    }
    if first
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b':' || b == b'-')
    {
        Some(first.to_string())
    } else {
        None
    }
}

fn bypass_key_present(headers: &HeaderMap) -> bool {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty())
}

/// Mounted before CORS and route dispatch. A non-empty opaque key header
/// bypasses the limiter; validating the key is an external concern.
async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let cap = state.api.rate_limit_per_window;
    if cap == 0 || bypass_key_present(req.headers()) {
        return next.run(req).await;
    }
    let client = normalized_forwarded_for(req.headers()).unwrap_or_else(|| "unknown".to_string());
    if state
        .limiter
        .allow(&client, cap, state.api.rate_limit_window)
        .await
    {
        next.run(req).await
    } else {
        api_error_response(&ApiError::rate_limited())
    }
}

async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let allowed = origin
        .as_deref()
        .is_some_and(|o| state.api.cors_allowed_origins.iter().any(|x| x == o));

    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if allowed {
            if let Some(origin) = origin.as_deref().and_then(|o| HeaderValue::from_str(o).ok()) {
                resp.headers_mut().insert("access-control-allow-origin", origin);
                resp.headers_mut().insert(
                    "access-control-allow-methods",
                    HeaderValue::from_static("GET,OPTIONS"),
                );
                resp.headers_mut().insert(
                    "access-control-allow-headers",
                    HeaderValue::from_static("x-api-key,content-type"),
                );
            }
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if allowed {
        if let Some(origin) = origin.as_deref().and_then(|o| HeaderValue::from_str(o).ok()) {
            resp.headers_mut().insert("access-control-allow-origin", origin);
        }
    }
    resp
}

/// Every response carries the hardening headers, including limiter and
/// timeout responses.
async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    resp
}

async fn deadline_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match timeout(state.api.request_deadline, next.run(req)).await {
        Ok(resp) => resp,
        Err(_) => api_error_response(&ApiError::timeout()),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        // Static prefixes before dynamic captures: the fixed ranking path is
        // registered ahead of the :id capture on the same prefix.
        .route(
            "/api/suppliers/ranking",
            get(http::handlers::ranking_handler),
        )
        .route("/api/suppliers/:id", get(http::handlers::supplier_handler))
        .route(
            "/api/suppliers/:id/graph",
            get(http::handlers::graph_handler),
        )
        .route(
            "/api/suppliers/:id/export",
            get(http::handlers::export_handler),
        )
        .route("/api/alerts", get(http::handlers::alerts_handler))
        .route(
            "/api/alerts/:kind",
            get(http::handlers::alerts_by_kind_handler),
        )
        .route("/api/search", get(http::handlers::search_handler))
        .route("/api/contracts", get(http::handlers::contracts_handler))
        .route(
            "/api/orgs/:org_code/dashboard",
            get(http::handlers::org_dashboard_handler),
        )
        .route("/api/stats", get(http::handlers::stats_handler))
        // Innermost first: deadline wraps the handlers, CORS sits inside the
        // limiter, the limiter inside the hardening headers.
        .layer(from_fn_with_state(state.clone(), deadline_middleware))
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state)
}
