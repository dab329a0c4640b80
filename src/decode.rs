//! Record decoding from YAML and JSON streams.
//!
//! Both formats can carry more than one top-level document in a stream
//! (`---`-separated YAML documents, whitespace-separated JSON values). A
//! single deserialize call only consumes one of them, so [`decode`] pulls
//! documents through a [`RecordStream`] until the stream reports its end and
//! returns every record it saw, in order.
//!
//! Each document is a sequence of `{path, url}` mappings, or null for none:
//!
//! ```yaml
//! - path: /docs
//!   url: https://example.com/docs
//! ---
//! - path: /blog
//!   url: https://example.com/blog
//! ```

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::DecodeError;
use crate::record::Record;

// ── RecordStream ──────────────────────────────────────────────────────────────

/// A source of record documents in one concrete format.
pub trait RecordStream {
    /// Decodes the next document and appends its records to `sink`.
    ///
    /// Returns `Ok(false)` once the stream is exhausted, without touching
    /// `sink`.
    fn decode_next(&mut self, sink: &mut Vec<Record>) -> Result<bool, DecodeError>;
}

/// Drains `stream` and returns every record of every document, in order.
///
/// The first malformed document aborts decoding; records gathered before it
/// are discarded.
pub fn decode(stream: &mut (impl RecordStream + ?Sized)) -> Result<Vec<Record>, DecodeError> {
    let mut records = Vec::new();
    while stream.decode_next(&mut records)? {}
    Ok(records)
}

// ── YAML ─────────────────────────────────────────────────────────────────────

/// YAML documents, via serde_yaml_ng's multi-document iterator.
pub struct YamlRecords<'de> {
    documents: serde_yaml_ng::Deserializer<'de>,
}

impl<'de> YamlRecords<'de> {
    pub fn new(reader: impl Read + 'de) -> Self {
        Self { documents: serde_yaml_ng::Deserializer::from_reader(reader) }
    }
}

impl RecordStream for YamlRecords<'_> {
    fn decode_next(&mut self, sink: &mut Vec<Record>) -> Result<bool, DecodeError> {
        let Some(document) = self.documents.next() else {
            return Ok(false);
        };
        let records = Option::<Vec<Record>>::deserialize(document)?;
        sink.extend(records.unwrap_or_default());
        Ok(true)
    }
}

// ── JSON ─────────────────────────────────────────────────────────────────────

/// JSON values, via serde_json's stream deserializer.
pub struct JsonRecords<R: Read> {
    documents: serde_json::StreamDeserializer<'static, serde_json::de::IoRead<R>, Option<Vec<Record>>>,
}

impl<R: Read> JsonRecords<R> {
    pub fn new(reader: R) -> Self {
        Self { documents: serde_json::Deserializer::from_reader(reader).into_iter() }
    }
}

impl<R: Read> RecordStream for JsonRecords<R> {
    fn decode_next(&mut self, sink: &mut Vec<Record>) -> Result<bool, DecodeError> {
        let Some(document) = self.documents.next() else {
            return Ok(false);
        };
        sink.extend(document?.unwrap_or_default());
        Ok(true)
    }
}

// ── Format ───────────────────────────────────────────────────────────────────

/// The encoding of a redirect source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Infers the format from a `.yaml`, `.yml` or `.json` extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Some(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Decodes every record in `reader`.
    pub fn decode(self, reader: impl Read) -> Result<Vec<Record>, DecodeError> {
        match self {
            Self::Yaml => decode(&mut YamlRecords::new(reader)),
            Self::Json => decode(&mut JsonRecords::new(reader)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Vec<Record> {
        vec![Record::new("/x", "https://y")]
    }

    #[test]
    fn yaml_and_json_agree() {
        let yaml = "- path: /x\n  url: https://y\n";
        let json = r#"[{"path": "/x", "url": "https://y"}]"#;
        assert_eq!(Format::Yaml.decode(yaml.as_bytes()).unwrap(), x());
        assert_eq!(Format::Json.decode(json.as_bytes()).unwrap(), x());
    }

    #[test]
    fn yaml_reads_every_document() {
        let yaml = "- path: /a\n  url: https://a\n---\n- path: /b\n  url: https://b\n";
        let records = Format::Yaml.decode(yaml.as_bytes()).unwrap();
        assert_eq!(records, vec![Record::new("/a", "https://a"), Record::new("/b", "https://b")]);
    }

    #[test]
    fn json_reads_every_document() {
        let json = "[{\"path\":\"/a\",\"url\":\"https://a\"}]\n[{\"path\":\"/b\",\"url\":\"https://b\"}]\n";
        let records = Format::Json.decode(json.as_bytes()).unwrap();
        assert_eq!(records, vec![Record::new("/a", "https://a"), Record::new("/b", "https://b")]);
    }

    #[test]
    fn decode_next_reports_end_of_stream() {
        let mut stream = JsonRecords::new(r#"[{"path":"/x","url":"https://y"}]"#.as_bytes());
        let mut sink = Vec::new();
        assert!(stream.decode_next(&mut sink).unwrap());
        assert!(!stream.decode_next(&mut sink).unwrap());
        assert_eq!(sink, x());
    }

    #[test]
    fn empty_streams_decode_to_nothing() {
        assert!(Format::Yaml.decode("".as_bytes()).unwrap().is_empty());
        assert!(Format::Json.decode("".as_bytes()).unwrap().is_empty());
        assert!(Format::Json.decode("null".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let records = Format::Yaml.decode("- path: /only-path\n  note: ignored\n".as_bytes()).unwrap();
        assert_eq!(records, vec![Record::new("/only-path", "")]);
    }

    #[test]
    fn malformed_input_is_an_error() {
        let err = Format::Json.decode(r#"[{"path": "/a", "url": "https://a"}, "#.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));

        let err = Format::Yaml.decode("- path: [unclosed\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::Yaml(_)));
    }

    #[test]
    fn error_after_good_document_discards_everything() {
        let json = r#"[{"path":"/a","url":"https://a"}] {"path": "#;
        assert!(Format::Json.decode(json.as_bytes()).is_err());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("redirects.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("redirects.YAML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("redirects.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("redirects.toml")), None);
        assert_eq!(Format::from_path(Path::new("redirects")), None);
    }
}
