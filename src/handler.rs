//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! A fallback chain links handlers of *different* concrete types: a
//! [`MapHandler`](crate::MapHandler) whose fallback is another `MapHandler`,
//! whose fallback is a plain `async fn`. Each link therefore holds its
//! successor as a **trait object** (`Arc<dyn Handler>`).
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ handler_fn(hello)
//! FnHandler(hello)                                 ← wrapper implements Handler
//!        ↓ Arc::new(…) as BoxedHandler
//! fallback.handle(req) at request time             ← one vtable dispatch
//!        ↓
//! Box::pin(async { hello(req).await.into_response() })  ← BoxFuture
//! ```
//!
//! The only runtime cost per link is one virtual call and, for `async fn`
//! handlers, one boxed future.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Send + 'static` let tokio move the future across worker threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Anything that can answer a request.
///
/// Implemented by [`MapHandler`](crate::MapHandler), by [`FnHandler`] (see
/// [`handler_fn`]) and by `Arc<H>` for any handler `H`, so a shared handler
/// can be used wherever an owned one is expected.
///
/// Handlers are immutable once built: `handle` takes `&self` and the same
/// instance serves every concurrent request.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: Request) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn handle(&self, req: Request) -> BoxFuture {
        (**self).handle(req)
    }
}

/// Wraps `f` so it can be used as a [`Handler`].
///
/// `f` is any function with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
pub fn handler_fn<F, Fut, R>(f: F) -> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    FnHandler(f)
}

/// Newtype wrapper that holds a concrete handler function `F` and implements
/// [`Handler`], bridging the typed world to the trait-object world.
///
/// Obtain via [`handler_fn`].
pub struct FnHandler<F>(F);

impl<F, Fut, R> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn handle(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
