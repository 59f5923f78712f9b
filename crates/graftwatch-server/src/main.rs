// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use clap::Parser;
use graftwatch_server::{
    build_router, load_startup_config, validate_startup_config, ApiConfig, AppState,
};
use graftwatch_store::SqliteStore;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "graftwatch-server", version, about = "Graftwatch supplier-risk query service")]
struct ServerCliArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bind: Option<String>,
    #[arg(long)]
    store_path: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    validate_config: bool,
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn api_config_from_env() -> ApiConfig {
    let defaults = ApiConfig::default();
    ApiConfig {
        rate_limit_per_window: env_u32(
            "GRAFTWATCH_RATE_LIMIT_PER_WINDOW",
            defaults.rate_limit_per_window,
        ),
        rate_limit_window: Duration::from_secs(env_u64(
            "GRAFTWATCH_RATE_LIMIT_WINDOW_SECS",
            defaults.rate_limit_window.as_secs(),
        )),
        request_deadline: Duration::from_secs(env_u64(
            "GRAFTWATCH_REQUEST_DEADLINE_SECS",
            defaults.request_deadline.as_secs(),
        )),
        cors_allowed_origins: env_list("GRAFTWATCH_CORS_ALLOWED_ORIGINS"),
        disclaimer: env::var("GRAFTWATCH_DISCLAIMER").unwrap_or(defaults.disclaimer),
        graph_max_nodes: env_usize("GRAFTWATCH_GRAPH_MAX_NODES", defaults.graph_max_nodes),
    }
}

fn main() -> std::process::ExitCode {
    let args = ServerCliArgs::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let startup = match load_startup_config(
        args.config.as_deref(),
        args.bind.as_deref(),
        args.store_path.as_deref(),
    ) {
        Ok(startup) => startup,
        Err(err) => {
            eprintln!("config error: {err}");
            return std::process::ExitCode::from(3);
        }
    };
    let api = api_config_from_env();
    if let Err(err) = validate_startup_config(&startup, &api) {
        eprintln!("config error: {err}");
        return std::process::ExitCode::from(3);
    }
    if args.validate_config {
        println!("configuration ok");
        return std::process::ExitCode::SUCCESS;
    }

    let store = match SqliteStore::open_read_only(&startup.store_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            eprintln!("store error: {err}");
            return std::process::ExitCode::from(4);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("runtime error: {err}");
            return std::process::ExitCode::from(10);
        }
    };

    runtime.block_on(async move {
        let state = AppState::from_store(store, api);
        let router = build_router(state);
        let listener = match TcpListener::bind(&startup.bind_addr).await {
            Ok(listener) => listener,
            Err(err) => {
                eprintln!("bind error on {}: {err}", startup.bind_addr);
                return std::process::ExitCode::from(10);
            }
        };
        info!(
            bind = %startup.bind_addr,
            store = %startup.store_path.display(),
            "graftwatch server listening"
        );
        if let Err(err) = axum::serve(listener, router).await {
            eprintln!("server error: {err}");
            return std::process::ExitCode::from(10);
        }
        std::process::ExitCode::SUCCESS
    })
}
