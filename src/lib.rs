//! # urlshort
//!
//! Permanent redirects from lookup tables, chained by fallback.
//!
//! ## The contract
//!
//! A request path either has a url in a table, in which case the answer is
//! `308 Permanent Redirect` to that url, or it does not, in which case the
//! next handler answers instead. Tables come from memory, YAML or JSON;
//! paths match byte-for-byte; urls are sent exactly as written.
//!
//! What urlshort intentionally ignores:
//!
//! - **URL validation** — a url is an opaque string
//! - **Pattern matching** — no wildcards, no prefixes, no normalization
//! - **Persistence** — tables are rebuilt from their sources on every start
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use urlshort::{Chain, Format, Server, Source, Table, fallback, handler_fn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), urlshort::Error> {
//!     let builtin = Table::from_iter([("/json-godoc", "https://pkg.go.dev/encoding/json")]);
//!
//!     let app = Chain::new()
//!         .source(Source::file(Format::Json, "redirects.json"))
//!         .source(Source::file(Format::Yaml, "redirects.yaml"))
//!         .source(Source::table(builtin))
//!         .build(handler_fn(fallback::hello))?;
//!
//!     Server::bind("0.0.0.0:8080".parse().unwrap()).serve(app).await
//! }
//! ```

mod chain;
mod config;
mod decode;
mod error;
mod handler;
mod record;
mod redirect;
mod request;
mod response;
mod server;
mod status;

pub mod fallback;

pub use chain::{Chain, Source, file_source};
pub use config::Config;
pub use decode::{Format, JsonRecords, RecordStream, YamlRecords, decode};
pub use error::{DecodeError, Error};
pub use handler::{BoxFuture, BoxedHandler, FnHandler, Handler, handler_fn};
pub use record::{Record, Table};
pub use redirect::{MapHandler, json_handler, map_handler, yaml_handler};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use server::{Server, serve_until};
pub use status::Status;
