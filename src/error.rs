//! Unified error types.
//!
//! Every error here happens at startup, while the fallback chain is being
//! assembled or the listener is being bound. Once the server is running,
//! request handling cannot fail: an unmatched path is a fallback, not an
//! error.

use std::path::PathBuf;

use thiserror::Error;

/// A redirect source that is not well-formed YAML or JSON.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// The error type returned by urlshort's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A redirect file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A redirect source could not be decoded. `origin` names the source.
    #[error("cannot decode {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: DecodeError,
    },

    /// Binding the listener failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
