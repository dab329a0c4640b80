//! The catch-all at the end of the default chain.
//!
//! Swap it out by passing any other handler to
//! [`Chain::build`](crate::Chain::build):
//!
//! ```rust
//! use urlshort::{Chain, Request, Response, Status, handler_fn};
//!
//! async fn not_found(_req: Request) -> Response {
//!     Response::status(Status::NotFound)
//! }
//!
//! let app = Chain::new().build(handler_fn(not_found)).unwrap();
//! ```

use crate::{Request, Response};

/// `200 OK` with body `"Hello, world!\n"`, whatever the request.
pub async fn hello(_req: Request) -> Response {
    Response::text("Hello, world!\n")
}
