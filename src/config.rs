//! Command-line configuration.
//!
//! Parsed once in `main` and passed down by reference; nothing reads flags
//! or environment after startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::chain::{Chain, Source};
use crate::decode::Format;
use crate::record::Table;

/// Redirect server settings.
#[derive(Clone, Debug, Parser)]
#[command(name = "urlshort", version, about = "Serve permanent redirects from YAML and JSON tables")]
pub struct Config {
    /// Redirects file in YAML format
    #[arg(long, value_name = "PATH", default_value = "redirects.yaml")]
    pub yaml: PathBuf,

    /// Redirects file in JSON format
    #[arg(long, value_name = "PATH", default_value = "redirects.json")]
    pub json: PathBuf,

    /// Address to listen on
    #[arg(long, value_name = "HOST:PORT", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,
}

impl Config {
    /// The redirect chain this configuration describes: the JSON file, then
    /// the YAML file, then `builtin`.
    pub fn chain(&self, builtin: Table) -> Chain {
        Chain::new()
            .source(Source::file(Format::Json, &self.json))
            .source(Source::file(Format::Yaml, &self.yaml))
            .source(Source::table(builtin))
    }
}
