//! `urlshort`: serve permanent redirects from a JSON file, a YAML file and
//! a built-in table, in that order, falling back to a greeting.
//!
//! Run with:
//!   RUST_LOG=urlshort=debug cargo run -- --yaml redirects.yaml --json redirects.json
//!
//! Try:
//!   curl -i http://localhost:8080/json-godoc
//!   curl -i http://localhost:8080/unknown

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use urlshort::{Config, Server, Table, fallback, handler_fn};

/// Redirects that are always available, consulted after both files.
const BUILTIN: &[(&str, &str)] = &[
    ("/json-godoc", "https://pkg.go.dev/encoding/json"),
    ("/yaml-godoc", "https://godoc.org/gopkg.in/yaml.v2"),
];

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "urlshort=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    tracing::info!(
        yaml = %config.yaml.display(),
        json = %config.json.display(),
        addr = %config.addr,
        "urlshort v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let builtin: Table = BUILTIN.iter().copied().collect();
    let app = match config.chain(builtin).build(handler_fn(fallback::hello)) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("cannot build redirect chain: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = Server::bind(config.addr).serve(app).await {
        tracing::error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
