//! Incoming HTTP request type.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use percent_encoding::percent_decode_str;

/// An incoming HTTP request.
///
/// Carries what a redirect decision can depend on: the method, the
/// percent-decoded path component of the URI (never the query), the raw
/// query and the headers. The body is never read.
#[derive(Clone, Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: HeaderMap,
}

impl Request {
    /// A request with no query and no headers.
    ///
    /// `path` is percent-decoded, so `/caf%C3%A9` and `/café` are the same
    /// request. A path whose escapes do not decode to UTF-8 is kept as sent.
    ///
    /// ```rust
    /// use urlshort::Request;
    /// let req = Request::new(http::Method::GET, "/docs");
    /// assert_eq!(req.path(), "/docs");
    /// ```
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: decode_path(path.into()), query: None, headers: HeaderMap::new() }
    }

    /// Shorthand for `Request::new(Method::GET, path)`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) =
            (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value))
        {
            self.headers.append(name, value);
        }
        self
    }

    pub(crate) fn from_parts(parts: &http::request::Parts) -> Self {
        Self {
            method: parts.method.clone(),
            path: decode_path(parts.uri.path().to_owned()),
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers.clone(),
        }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// Case-insensitive header lookup. Non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

fn decode_path(raw: String) -> String {
    match percent_decode_str(&raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}
