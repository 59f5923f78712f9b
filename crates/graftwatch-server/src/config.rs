// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DISCLAIMER: &str = "Automatically derived from public open data. \
     Signals are not accusations; correlation does not imply causation.";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STORE_PATH: &str = "artifacts/analytical.db";

/// Request-serving knobs. Everything is injected at boot; the rate-limit
/// bucket map is the only process-global mutable state.
#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    /// Requests per window per client address; 0 disables the limiter.
    pub rate_limit_per_window: u32,
    pub rate_limit_window: Duration,
    pub request_deadline: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub disclaimer: String,
    pub graph_max_nodes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_window: 60,
            rate_limit_window: Duration::from_secs(60),
            request_deadline: Duration::from_secs(10),
            cors_allowed_origins: Vec::new(),
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
            graph_max_nodes: graftwatch_store::DEFAULT_GRAPH_MAX_NODES,
        }
    }
}

/// Boot-time startup settings resolved from `CLI > ENV > config file >
/// defaults`.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeStartupConfig {
    pub bind_addr: String,
    pub store_path: PathBuf,
    /// Must be true; the service never writes the analytical store.
    pub read_only: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RuntimeStartupConfigFile {
    bind_addr: Option<String>,
    store_path: Option<PathBuf>,
    read_only: Option<bool>,
}

pub fn validate_startup_config(
    startup: &RuntimeStartupConfig,
    api: &ApiConfig,
) -> Result<(), String> {
    if !startup.read_only {
        return Err("the analytical store must be opened read-only".to_string());
    }
    if api.rate_limit_window.is_zero() {
        return Err("rate limit window must be > 0".to_string());
    }
    if api.request_deadline.is_zero() {
        return Err("request deadline must be > 0".to_string());
    }
    if api.graph_max_nodes == 0 {
        return Err("graph node cap must be > 0".to_string());
    }
    if api.cors_allowed_origins.iter().any(|o| o == "*") {
        return Err("CORS allow-list must not contain a wildcard".to_string());
    }
    if api.disclaimer.trim().is_empty() {
        return Err("disclaimer text must not be empty".to_string());
    }
    Ok(())
}

fn parse_startup_config_file(path: &Path) -> Result<RuntimeStartupConfigFile, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("failed reading config file {}: {err}", path.display()))?;
    match path.extension().and_then(|v| v.to_str()) {
        Some("json") => serde_json::from_str(&text)
            .map_err(|err| format!("invalid config json {}: {err}", path.display())),
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .map_err(|err| format!("invalid config yaml {}: {err}", path.display())),
        Some("toml") => toml::from_str(&text)
            .map_err(|err| format!("invalid config toml {}: {err}", path.display())),
        _ => Err(format!(
            "unsupported config extension for {} (expected .json/.yaml/.yml/.toml)",
            path.display()
        )),
    }
}

fn resolve_startup_config(
    file_cfg: RuntimeStartupConfigFile,
    cli_bind_addr: Option<&str>,
    cli_store_path: Option<&Path>,
    env_bind_addr: Option<String>,
    env_store_path: Option<PathBuf>,
) -> Result<RuntimeStartupConfig, String> {
    let bind_addr = cli_bind_addr
        .map(ToString::to_string)
        .or(env_bind_addr)
        .or(file_cfg.bind_addr)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let store_path = cli_store_path
        .map(Path::to_path_buf)
        .or(env_store_path)
        .or(file_cfg.store_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));

    if bind_addr.trim().is_empty() {
        return Err("bind_addr must not be empty".to_string());
    }
    if store_path.as_os_str().is_empty() {
        return Err("store_path must not be empty".to_string());
    }

    Ok(RuntimeStartupConfig {
        bind_addr,
        store_path,
        read_only: file_cfg.read_only.unwrap_or(true),
    })
}

pub fn load_startup_config(
    config_path: Option<&Path>,
    cli_bind_addr: Option<&str>,
    cli_store_path: Option<&Path>,
) -> Result<RuntimeStartupConfig, String> {
    let file_cfg = if let Some(path) = config_path {
        parse_startup_config_file(path)?
    } else {
        RuntimeStartupConfigFile::default()
    };
    resolve_startup_config(
        file_cfg,
        cli_bind_addr,
        cli_store_path,
        std::env::var("GRAFTWATCH_BIND").ok(),
        std::env::var("GRAFTWATCH_STORE_PATH").ok().map(PathBuf::from),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_env_and_file() {
        let resolved = resolve_startup_config(
            RuntimeStartupConfigFile {
                bind_addr: Some("127.0.0.1:9000".to_string()),
                store_path: Some(PathBuf::from("from-file.db")),
                read_only: None,
            },
            Some("127.0.0.1:9200"),
            Some(Path::new("from-cli.db")),
            Some("127.0.0.1:9100".to_string()),
            Some(PathBuf::from("from-env.db")),
        )
        .expect("resolve");
        assert_eq!(resolved.bind_addr, "127.0.0.1:9200");
        assert_eq!(resolved.store_path, PathBuf::from("from-cli.db"));
        assert!(resolved.read_only);
    }

    #[test]
    fn env_overrides_file() {
        let resolved = resolve_startup_config(
            RuntimeStartupConfigFile {
                bind_addr: Some("127.0.0.1:9000".to_string()),
                store_path: Some(PathBuf::from("from-file.db")),
                read_only: Some(true),
            },
            None,
            None,
            Some("127.0.0.1:9100".to_string()),
            None,
        )
        .expect("resolve");
        assert_eq!(resolved.bind_addr, "127.0.0.1:9100");
        assert_eq!(resolved.store_path, PathBuf::from("from-file.db"));
    }

    #[test]
    fn defaults_apply_without_sources() {
        let resolved = resolve_startup_config(
            RuntimeStartupConfigFile::default(),
            None,
            None,
            None,
            None,
        )
        .expect("resolve");
        assert_eq!(resolved.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(resolved.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    }

    #[test]
    fn validation_rejects_writable_store_and_wildcard_cors() {
        let startup = RuntimeStartupConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            read_only: false,
        };
        let err = validate_startup_config(&startup, &ApiConfig::default()).expect_err("writable");
        assert!(err.contains("read-only"));

        let startup = RuntimeStartupConfig {
            read_only: true,
            ..startup
        };
        let api = ApiConfig {
            cors_allowed_origins: vec!["*".to_string()],
            ..ApiConfig::default()
        };
        let err = validate_startup_config(&startup, &api).expect_err("wildcard");
        assert!(err.contains("wildcard"));
    }
}
