// SPDX-License-Identifier: Apache-2.0

//! Query-parameter validation. Out-of-range values are rejected with 422,
//! never clamped.

use crate::errors::ApiError;
use graftwatch_model::{AlertKind, CompanyId, GovOrgCode};
use std::collections::HashMap;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;
pub const MIN_QUERY_LEN: usize = 1;
pub const MAX_QUERY_LEN: usize = 200;

pub fn parse_limit(params: &HashMap<String, String>) -> Result<i64, ApiError> {
    match params.get("limit") {
        None => Ok(DEFAULT_LIMIT),
        Some(raw) => {
            let limit: i64 = raw
                .parse()
                .map_err(|_| ApiError::invalid_input("limit must be an integer"))?;
            if !(1..=MAX_LIMIT).contains(&limit) {
                return Err(ApiError::invalid_input("limit must be within [1, 100]"));
            }
            Ok(limit)
        }
    }
}

pub fn parse_offset(params: &HashMap<String, String>) -> Result<i64, ApiError> {
    match params.get("offset") {
        None => Ok(0),
        Some(raw) => {
            let offset: i64 = raw
                .parse()
                .map_err(|_| ApiError::invalid_input("offset must be an integer"))?;
            if offset < 0 {
                return Err(ApiError::invalid_input("offset must not be negative"));
            }
            Ok(offset)
        }
    }
}

/// Search term: trimmed, non-empty, at most 200 characters.
pub fn parse_search_query(params: &HashMap<String, String>) -> Result<String, ApiError> {
    let raw = params
        .get("q")
        .ok_or_else(|| ApiError::invalid_input("missing query parameter q"))?;
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len < MIN_QUERY_LEN || len > MAX_QUERY_LEN {
        return Err(ApiError::invalid_input(
            "query length must be within [1, 200]",
        ));
    }
    Ok(trimmed.to_string())
}

/// Path identifier: punctuation is stripped, the checksum must hold.
pub fn parse_company_id(raw: &str) -> Result<CompanyId, ApiError> {
    CompanyId::parse(raw).map_err(|_| ApiError::invalid_input("invalid supplier identifier"))
}

pub fn parse_alert_kind(raw: &str) -> Result<AlertKind, ApiError> {
    AlertKind::parse(raw).map_err(|_| ApiError::invalid_input("unknown alert kind"))
}

pub fn parse_org_code(raw: &str) -> Result<GovOrgCode, ApiError> {
    GovOrgCode::parse(raw).map_err(|_| ApiError::invalid_input("invalid org code"))
}

pub fn parse_optional_supplier(
    params: &HashMap<String, String>,
) -> Result<Option<CompanyId>, ApiError> {
    params.get("id").map(|raw| parse_company_id(raw)).transpose()
}

pub fn parse_optional_org(
    params: &HashMap<String, String>,
) -> Result<Option<GovOrgCode>, ApiError> {
    params
        .get("orgCode")
        .map(|raw| parse_org_code(raw))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(parse_limit(&params(&[])).expect("default"), 20);
        assert_eq!(parse_limit(&params(&[("limit", "100")])).expect("max"), 100);
        assert!(parse_limit(&params(&[("limit", "0")])).is_err());
        assert!(parse_limit(&params(&[("limit", "101")])).is_err());
        assert!(parse_limit(&params(&[("limit", "abc")])).is_err());
    }

    #[test]
    fn offset_defaults_and_bounds() {
        assert_eq!(parse_offset(&params(&[])).expect("default"), 0);
        assert!(parse_offset(&params(&[("offset", "-1")])).is_err());
    }

    #[test]
    fn query_length_is_enforced() {
        assert!(parse_search_query(&params(&[])).is_err());
        assert!(parse_search_query(&params(&[("q", "")])).is_err());
        assert!(parse_search_query(&params(&[("q", "   ")])).is_err());
        assert_eq!(
            parse_search_query(&params(&[("q", "  a  ")])).expect("trimmed"),
            "a"
        );
        assert_eq!(
            parse_search_query(&params(&[("q", " ab ")])).expect("trimmed"),
            "ab"
        );
        let long = "x".repeat(201);
        assert!(parse_search_query(&params(&[("q", long.as_str())])).is_err());
    }

    #[test]
    fn company_id_path_param_strips_punctuation() {
        assert!(parse_company_id("11.144.477/7000-61").is_ok());
        assert!(parse_company_id("11144477700062").is_err());
    }

    #[test]
    fn alert_kind_rejects_unknown() {
        assert!(parse_alert_kind("STRAWMAN").is_ok());
        assert!(parse_alert_kind("NOT_A_KIND").is_err());
    }
}
