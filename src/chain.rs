//! Fallback chain assembly.
//!
//! A [`Chain`] lists redirect sources from highest to lowest priority. On
//! [`Chain::build`] each source becomes a [`MapHandler`] whose fallback is
//! the handler built from the next source; the last one falls back to the
//! default handler you pass in.
//!
//! ```text
//! request ─▶ source 1 ─miss─▶ source 2 ─miss─▶ … ─miss─▶ default
//!               │hit             │hit
//!               ▼                ▼
//!              308              308
//! ```
//!
//! Links are built from the tail forward, so sources are decoded in reverse
//! priority order. The first source that cannot be opened or decoded aborts
//! the build and no handler is returned.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::decode::Format;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::record::Table;
use crate::redirect::MapHandler;

// ── Source ───────────────────────────────────────────────────────────────────

/// Where one link of the chain gets its table.
pub enum Source {
    /// A table that is already in memory.
    Table(Table),
    /// An open stream in a known format. `label` names it in logs and errors.
    Reader {
        format: Format,
        label: String,
        reader: Box<dyn Read + Send>,
    },
    /// A file opened when the chain is built.
    File { format: Format, path: PathBuf },
}

impl Source {
    pub fn table(table: impl Into<Table>) -> Self {
        Self::Table(table.into())
    }

    pub fn reader(format: Format, label: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self::Reader { format, label: label.into(), reader: Box::new(reader) }
    }

    pub fn file(format: Format, path: impl Into<PathBuf>) -> Self {
        Self::File { format, path: path.into() }
    }

    /// Resolves the source into its lookup table.
    pub fn load(self) -> Result<Table, Error> {
        match self {
            Self::Table(table) => Ok(table),
            Self::Reader { format, label, reader } => decode_table(format, &label, reader),
            Self::File { format, path } => {
                let file = File::open(&path)
                    .map_err(|source| Error::SourceUnavailable { path: path.clone(), source })?;
                decode_table(format, &path.display().to_string(), BufReader::new(file))
            }
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Table(_) => "in-memory table".to_owned(),
            Self::Reader { label, .. } => label.clone(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => f.debug_tuple("Table").field(&table.len()).finish(),
            Self::Reader { format, label, .. } => f.debug_struct("Reader")
                .field("format", format)
                .field("label", label)
                .finish_non_exhaustive(),
            Self::File { format, path } => f.debug_struct("File")
                .field("format", format)
                .field("path", path)
                .finish(),
        }
    }
}

fn decode_table(format: Format, origin: &str, reader: impl Read) -> Result<Table, Error> {
    let records = format
        .decode(reader)
        .map_err(|source| Error::Decode { origin: origin.to_owned(), source })?;
    Ok(Table::from_records(records))
}

/// A file source whose format follows its extension, if it has a known one.
pub fn file_source(path: &Path) -> Option<Source> {
    Format::from_path(path).map(|format| Source::file(format, path))
}

// ── Chain ────────────────────────────────────────────────────────────────────

/// Redirect sources in priority order, first consulted first.
#[derive(Debug, Default)]
pub struct Chain {
    sources: Vec<Source>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source below every source added so far.
    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Links every source into one handler that ends in `default`.
    ///
    /// With no sources the result is `default` itself.
    pub fn build(self, default: impl Handler) -> Result<BoxedHandler, Error> {
        let mut next: BoxedHandler = Arc::new(default);
        for source in self.sources.into_iter().rev() {
            let label = source.label();
            let table = source.load()?;
            info!(source = %label, entries = table.len(), "redirect table loaded");
            next = Arc::new(MapHandler::with_shared_fallback(table, next));
        }
        Ok(next)
    }
}

impl FromIterator<Source> for Chain {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        Self { sources: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::DecodeError;
    use crate::handler::handler_fn;
    use crate::request::Request;
    use crate::status::Status;

    fn hello() -> impl Handler {
        handler_fn(|_req| async { "Hello, world!" })
    }

    #[tokio::test]
    async fn miss_in_first_falls_into_second() {
        let handler = Chain::new()
            .source(Source::table(Table::from_iter([("/one", "https://one")])))
            .source(Source::table(Table::from_iter([("/two", "https://two")])))
            .build(handler_fn(|_req| async { Status::Gone }))
            .unwrap();

        let res = handler.handle(Request::get("/two")).await;
        assert_eq!(res.status_code(), 308);
        assert_eq!(res.header("location"), Some("https://two"));

        let res = handler.handle(Request::get("/one")).await;
        assert_eq!(res.header("location"), Some("https://one"));

        let res = handler.handle(Request::get("/three")).await;
        assert_eq!(res.status_code(), 410);
    }

    #[tokio::test]
    async fn earlier_source_shadows_later() {
        let handler = Chain::new()
            .source(Source::reader(Format::Json, "json", r#"[{"path":"/p","url":"https://json"}]"#.as_bytes()))
            .source(Source::reader(Format::Yaml, "yaml", "- path: /p\n  url: https://yaml\n".as_bytes()))
            .build(hello())
            .unwrap();

        let res = handler.handle(Request::get("/p")).await;
        assert_eq!(res.header("location"), Some("https://json"));
    }

    #[tokio::test]
    async fn empty_chain_is_the_default() {
        let chain = Chain::new();
        assert!(chain.is_empty());

        let res = chain.build(hello()).unwrap().handle(Request::get("/anything")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"Hello, world!");
    }

    #[test]
    fn decode_failure_aborts_the_build() {
        let err = Chain::new()
            .source(Source::reader(Format::Yaml, "good.yaml", "- path: /a\n  url: https://a\n".as_bytes()))
            .source(Source::reader(Format::Json, "broken.json", "[{".as_bytes()))
            .build(hello())
            .err()
            .unwrap();

        match err {
            Error::Decode { origin, source: DecodeError::Json(_) } => assert_eq!(origin, "broken.json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_unavailable() {
        let path = std::env::temp_dir().join("urlshort-chain-test-does-not-exist.yaml");
        let err = Chain::from_iter([Source::file(Format::Yaml, &path)])
            .build(hello())
            .err()
            .unwrap();

        assert!(matches!(err, Error::SourceUnavailable { path: p, .. } if p == path));
    }

    #[tokio::test]
    async fn file_source_is_read_at_build_time() {
        let path = std::env::temp_dir().join(format!("urlshort-chain-test-{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(br#"[{"path":"/f","url":"https://file"}]"#).unwrap();
        drop(file);

        let source = file_source(&path).unwrap();
        let handler = Chain::new().source(source).build(hello()).unwrap();
        std::fs::remove_file(&path).unwrap();

        let res = handler.handle(Request::get("/f")).await;
        assert_eq!(res.header("location"), Some("https://file"));
    }
}
