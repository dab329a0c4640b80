//! HTTP status codes as a typed enum.
//!
//! The codes urlshort emits (`200`, `308`) and the few its tests give
//! custom fallbacks (`204`, `404`, `410`). Use [`Status`] anywhere a status
//! code is accepted: `Response::status()`, `Response::builder().status()`,
//! or as a bare handler return value.
//!
//! ```rust
//! use urlshort::{Response, Status};
//!
//! Response::status(Status::NoContent);
//!
//! Response::builder()
//!     .status(Status::PermanentRedirect)
//!     .header("location", "https://example.com/")
//!     .no_body();
//! ```

/// An HTTP status code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200
    NoContent,           // 204

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    PermanentRedirect,   // 308

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    NotFound,            // 404
    Gone,                // 410
}

impl Status {
    /// Numeric code, e.g. `308`.
    pub fn code(self) -> u16 {
        self.into()
    }

    /// Canonical reason phrase, e.g. `"Permanent Redirect"`.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok                  => "OK",
            Self::NoContent           => "No Content",
            Self::PermanentRedirect   => "Permanent Redirect",
            Self::NotFound            => "Not Found",
            Self::Gone                => "Gone",
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::NoContent           => 204,
            Status::PermanentRedirect   => 308,
            Status::NotFound            => 404,
            Status::Gone                => 410,
        }
    }
}
