//! The redirect resolver: one link of a fallback chain.

use std::io::Read;
use std::sync::Arc;

use http::Method;
use tracing::debug;

use crate::decode::Format;
use crate::error::DecodeError;
use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::record::Table;
use crate::request::Request;
use crate::response::{Response, html_escape};
use crate::status::Status;

/// Redirects mapped paths and hands everything else to a fallback.
///
/// For a request whose path has a non-empty url in the table, the response
/// is a `308 Permanent Redirect` to that url and the fallback is never
/// called. Otherwise the fallback's future is returned as-is, so a miss is
/// indistinguishable from calling the fallback directly.
pub struct MapHandler {
    table: Table,
    fallback: BoxedHandler,
}

impl MapHandler {
    pub fn new(table: Table, fallback: impl Handler) -> Self {
        Self { table, fallback: Arc::new(fallback) }
    }

    /// Like [`MapHandler::new`], for a fallback that is already shared.
    pub fn with_shared_fallback(table: Table, fallback: BoxedHandler) -> Self {
        Self { table, fallback }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}

impl Handler for MapHandler {
    fn handle(&self, req: Request) -> BoxFuture {
        match self.table.lookup(req.path()) {
            Some(url) => {
                debug!(path = req.path(), url, "redirect");
                let res = permanent_redirect(req.method(), url);
                Box::pin(async move { res })
            }
            None => {
                debug!(path = req.path(), "no mapping, falling back");
                self.fallback.handle(req)
            }
        }
    }
}

/// `308` to `url`. `GET` and `HEAD` also get a one-line HTML note pointing
/// at the target, for clients that do not follow redirects.
fn permanent_redirect(method: &Method, url: &str) -> Response {
    if *method != Method::GET && *method != Method::HEAD {
        return Response::redirect(Status::PermanentRedirect, url);
    }

    let note = format!(
        "<a href=\"{}\">{}</a>.\n",
        html_escape(url),
        Status::PermanentRedirect.reason(),
    );
    Response::builder()
        .status(Status::PermanentRedirect)
        .header("location", url)
        .html(note)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Resolver over an in-memory table.
pub fn map_handler(table: impl Into<Table>, fallback: impl Handler) -> MapHandler {
    MapHandler::new(table.into(), fallback)
}

/// Resolver over the records of a YAML stream.
///
/// ```yaml
/// - path: /some-path
///   url: https://www.some-url.com/demo
/// ```
pub fn yaml_handler(yaml: impl Read, fallback: impl Handler) -> Result<MapHandler, DecodeError> {
    let records = Format::Yaml.decode(yaml)?;
    Ok(MapHandler::new(Table::from_records(records), fallback))
}

/// Resolver over the records of a JSON stream.
///
/// ```json
/// [{"path": "/some-path", "url": "https://www.some-url.com/demo"}]
/// ```
pub fn json_handler(json: impl Read, fallback: impl Handler) -> Result<MapHandler, DecodeError> {
    let records = Format::Json.decode(json)?;
    Ok(MapHandler::new(Table::from_records(records), fallback))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::handler::handler_fn;

    fn counting_fallback(calls: Arc<AtomicUsize>) -> impl Handler {
        handler_fn(move |req: Request| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { format!("fallback saw {}", req.path()) }
        })
    }

    fn godoc() -> Table {
        Table::from_iter([
            ("/json-godoc", "https://pkg.go.dev/encoding/json"),
            ("/blank", ""),
        ])
    }

    #[tokio::test]
    async fn hit_redirects_without_calling_fallback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = MapHandler::new(godoc(), counting_fallback(Arc::clone(&calls)));

        let res = handler.handle(Request::get("/json-godoc")).await;

        assert_eq!(res.status_code(), 308);
        assert_eq!(res.header("location"), Some("https://pkg.go.dev/encoding/json"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn miss_is_the_fallback_response() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = MapHandler::new(godoc(), counting_fallback(Arc::clone(&calls)));

        let via_chain = handler.handle(Request::get("/unknown")).await;
        let direct = counting_fallback(Arc::clone(&calls)).handle(Request::get("/unknown")).await;

        assert_eq!(via_chain.status_code(), direct.status_code());
        assert_eq!(via_chain.headers(), direct.headers());
        assert_eq!(via_chain.body(), direct.body());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_url_falls_back() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = MapHandler::new(godoc(), counting_fallback(Arc::clone(&calls)));

        let res = handler.handle(Request::get("/blank")).await;

        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"fallback saw /blank");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn path_is_matched_verbatim() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = MapHandler::new(godoc(), counting_fallback(Arc::clone(&calls)));

        for path in ["/JSON-godoc", "/json-godoc/", "/json-godoc%20"] {
            let res = handler.handle(Request::get(path)).await;
            assert_eq!(res.status_code(), 200, "{path}");
        }
        let res = handler.handle(Request::get("/json-godoc").with_query("x=1")).await;
        assert_eq!(res.status_code(), 308);
    }

    #[tokio::test]
    async fn escaped_request_path_hits_decoded_key() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = MapHandler::new(
            Table::from_iter([("/café", "https://cafe"), ("/a b", "https://ab")]),
            counting_fallback(Arc::clone(&calls)),
        );

        let res = handler.handle(Request::get("/caf%C3%A9")).await;
        assert_eq!(res.status_code(), 308);
        assert_eq!(res.header("location"), Some("https://cafe"));

        let res = handler.handle(Request::get("/a%20b")).await;
        assert_eq!(res.header("location"), Some("https://ab"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn get_gets_an_html_note_post_does_not() {
        let handler = map_handler(
            Table::from_iter([("/q", "https://example.com/?a=1&b=2")]),
            handler_fn(|_req| async { Status::NotFound }),
        );

        let res = handler.handle(Request::get("/q")).await;
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(
            res.body(),
            b"<a href=\"https://example.com/?a=1&amp;b=2\">Permanent Redirect</a>.\n",
        );
        assert_eq!(res.header("location"), Some("https://example.com/?a=1&b=2"));

        let res = handler.handle(Request::new(Method::POST, "/q")).await;
        assert_eq!(res.status_code(), 308);
        assert!(res.body().is_empty());
        assert_eq!(res.header("content-type"), None);
    }

    #[tokio::test]
    async fn map_handler_takes_a_hashmap() {
        let mut paths = HashMap::new();
        paths.insert("/a".to_owned(), "https://a".to_owned());
        let handler = map_handler(paths, handler_fn(|_req| async { Status::NotFound }));

        assert_eq!(handler.handle(Request::get("/a")).await.status_code(), 308);
        assert_eq!(handler.handle(Request::get("/b")).await.status_code(), 404);
    }

    #[tokio::test]
    async fn yaml_and_json_handlers_decode_first() {
        let fallback = || handler_fn(|_req| async { Status::NotFound });

        let yaml = yaml_handler("- path: /y\n  url: https://y\n".as_bytes(), fallback()).unwrap();
        assert_eq!(yaml.table().lookup("/y"), Some("https://y"));

        let json = json_handler(r#"[{"path":"/j","url":"https://j"}]"#.as_bytes(), fallback()).unwrap();
        assert_eq!(json.handle(Request::get("/j")).await.header("location"), Some("https://j"));

        assert!(json_handler("{".as_bytes(), fallback()).is_err());
    }
}
