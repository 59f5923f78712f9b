use crate::{api_error_response, AppState};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use graftwatch_api::{
    dossier_to_csv, dossier_to_json, params, ApiError, ExportFormat,
};
use graftwatch_store::{ContractFilter, StoreError};
use serde_json::json;
use std::collections::HashMap;
use tracing::{error, info};

/// Adapter failures map to one opaque internal error; the class and route go
/// to the log, never to the response.
fn store_failure(route: &'static str, err: &StoreError) -> Response {
    error!(route, class = "store_error", "adapter failure: {err}");
    api_error_response(&ApiError::internal())
}

/// Identifiers are logged at most by their last four digits.
fn last_four(raw: &str) -> String {
    let digits = graftwatch_model::strip_id_punctuation(raw);
    let tail: String = digits
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    tail
}

pub(crate) async fn healthz_handler() -> Response {
    Json(json!({"status": "ok"})).into_response()
}

pub(crate) async fn supplier_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match params::parse_company_id(&raw_id) {
        Ok(id) => id,
        Err(err) => {
            info!(
                route = "/api/suppliers/{id}",
                class = "input_invalid",
                id_last4 = %last_four(&raw_id),
                "rejected supplier identifier"
            );
            return api_error_response(&err);
        }
    };
    match state.dossier.fetch(&id).await {
        Ok(Some(dossier)) => Json(dossier).into_response(),
        Ok(None) => api_error_response(&ApiError::not_found()),
        Err(err) => store_failure("/api/suppliers/{id}", &err),
    }
}

pub(crate) async fn ranking_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let (limit, offset) = match (params::parse_limit(&query), params::parse_offset(&query)) {
        (Ok(limit), Ok(offset)) => (limit, offset),
        (Err(err), _) | (_, Err(err)) => return api_error_response(&err),
    };
    match state.ranking.ranking(limit, offset).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => store_failure("/api/suppliers/ranking", &err),
    }
}

pub(crate) async fn graph_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match params::parse_company_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return api_error_response(&err),
    };
    match state.graph.fetch(&id).await {
        Ok(Some(view)) => Json(view).into_response(),
        Ok(None) => api_error_response(&ApiError::not_found()),
        Err(err) => store_failure("/api/suppliers/{id}/graph", &err),
    }
}

pub(crate) async fn export_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let id = match params::parse_company_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return api_error_response(&err),
    };
    let format = match query
        .get("format")
        .ok_or_else(|| ApiError::invalid_input("missing export format"))
        .and_then(|raw| ExportFormat::parse(raw))
    {
        Ok(format) => format,
        Err(err) => return api_error_response(&err),
    };
    let dossier = match state.dossier.fetch(&id).await {
        Ok(Some(dossier)) => dossier,
        Ok(None) => return api_error_response(&ApiError::not_found()),
        Err(err) => return store_failure("/api/suppliers/{id}/export", &err),
    };
    match format {
        ExportFormat::Json => match dossier_to_json(&dossier) {
            Ok(body) => (
                [(header::CONTENT_TYPE, ExportFormat::Json.content_type())],
                body,
            )
                .into_response(),
            Err(err) => api_error_response(&err),
        },
        ExportFormat::Csv => {
            let disposition = format!("attachment; filename={}.csv", id.as_str());
            (
                [
                    (header::CONTENT_TYPE, ExportFormat::Csv.content_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                dossier_to_csv(&dossier),
            )
                .into_response()
        }
        ExportFormat::Pdf => api_error_response(&ApiError::unimplemented()),
    }
}

pub(crate) async fn alerts_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let (limit, offset) = match (params::parse_limit(&query), params::parse_offset(&query)) {
        (Ok(limit), Ok(offset)) => (limit, offset),
        (Err(err), _) | (_, Err(err)) => return api_error_response(&err),
    };
    match state.feed.feed(limit, offset).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => store_failure("/api/alerts", &err),
    }
}

pub(crate) async fn alerts_by_kind_handler(
    State(state): State<AppState>,
    Path(raw_kind): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let kind = match params::parse_alert_kind(&raw_kind) {
        Ok(kind) => kind,
        Err(err) => return api_error_response(&err),
    };
    let (limit, offset) = match (params::parse_limit(&query), params::parse_offset(&query)) {
        (Ok(limit), Ok(offset)) => (limit, offset),
        (Err(err), _) | (_, Err(err)) => return api_error_response(&err),
    };
    match state.feed.feed_by_kind(kind, limit, offset).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => store_failure("/api/alerts/{kind}", &err),
    }
}

pub(crate) async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let term = match params::parse_search_query(&query) {
        Ok(term) => term,
        Err(err) => return api_error_response(&err),
    };
    let limit = match params::parse_limit(&query) {
        Ok(limit) => limit,
        Err(err) => return api_error_response(&err),
    };
    match state.search.search(&term, limit).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => store_failure("/api/search", &err),
    }
}

pub(crate) async fn contracts_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let filter = match (
        params::parse_optional_supplier(&query),
        params::parse_optional_org(&query),
    ) {
        (Ok(supplier), Ok(org_code)) => ContractFilter { supplier, org_code },
        (Err(err), _) | (_, Err(err)) => return api_error_response(&err),
    };
    let (limit, offset) = match (params::parse_limit(&query), params::parse_offset(&query)) {
        (Ok(limit), Ok(offset)) => (limit, offset),
        (Err(err), _) | (_, Err(err)) => return api_error_response(&err),
    };
    match state.contracts.list(&filter, limit, offset).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => store_failure("/api/contracts", &err),
    }
}

pub(crate) async fn org_dashboard_handler(
    State(state): State<AppState>,
    Path(raw_code): Path<String>,
) -> Response {
    let code = match params::parse_org_code(&raw_code) {
        Ok(code) => code,
        Err(err) => return api_error_response(&err),
    };
    match state.orgs.dashboard(&code).await {
        Ok(Some(dashboard)) => Json(dashboard).into_response(),
        Ok(None) => api_error_response(&ApiError::not_found()),
        Err(err) => store_failure("/api/orgs/{orgCode}/dashboard", &err),
    }
}

pub(crate) async fn stats_handler(State(state): State<AppState>) -> Response {
    match state.stats.rollup().await {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => store_failure("/api/stats", &err),
    }
}
