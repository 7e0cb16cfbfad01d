//! Business handlers and the type-erased request handler.
//!
//! # From user code to the transport
//!
//! ```text
//! async fn create(ctx: Context, req: Request) -> Result<Faction, Failure>   ← HandlerFunc
//!        ↓ Endpoint::builder(encoder, create).with_before(..).build()
//! Endpoint<JsonEncoder, fn(..)>                                             ← typed, immutable
//!        ↓ .handler_func(TracingSink)
//! RequestHandler(Arc<dyn ErasedHandler>)                                    ← what the server holds
//!        ↓ handler.call(ctx, req)  once per request
//! BoxFuture<Response>
//! ```
//!
//! The value type of the business handler is erased at the last step: by the
//! time the server sees the endpoint, it only produces [`Response`]s.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use crate::context::Context;
use crate::problem::Failure;
use crate::request::Request;
use crate::response::Response;

/// A heap-allocated, type-erased future.
///
/// `Send + 'static` lets tokio move it across worker threads.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

// ── HandlerFunc ───────────────────────────────────────────────────────────────

/// The business logic of an endpoint.
///
/// Implemented for every function of the shape
///
/// ```text
/// async fn name(ctx: Context, req: Request) -> Result<impl Serialize, Failure>
/// ```
///
/// Implement it by hand for handlers that carry state, such as a repository.
pub trait HandlerFunc: Send + Sync + 'static {
    /// The success value, encoded into the response body.
    type Output: Serialize + Send + 'static;

    fn call(&self, ctx: Context, req: Request) -> BoxFuture<Result<Self::Output, Failure>>;
}

impl<F, Fut, T> HandlerFunc for F
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, Failure>> + Send + 'static,
    T: Serialize + Send + 'static,
{
    type Output = T;

    fn call(&self, ctx: Context, req: Request) -> BoxFuture<Result<T, Failure>> {
        Box::pin(self(ctx, req))
    }
}

// ── RequestHandler ────────────────────────────────────────────────────────────

/// Dispatch interface behind [`RequestHandler`].
pub(crate) trait ErasedHandler {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture<Response>;

    /// Answers a request that could not be handed to the endpoint.
    fn fail(&self, ctx: Context, failure: Failure) -> Response;
}

/// A fully wired endpoint: handles one request, produces one response, never fails.
///
/// Obtained from [`Endpoint::handler_func`](crate::Endpoint::handler_func).
/// Cloning is one atomic increment; the server shares a single instance across
/// every connection.
#[derive(Clone)]
pub struct RequestHandler(Arc<dyn ErasedHandler + Send + Sync + 'static>);

impl RequestHandler {
    pub(crate) fn new(inner: impl ErasedHandler + Send + Sync + 'static) -> Self {
        Self(Arc::new(inner))
    }

    pub fn call(&self, ctx: Context, req: Request) -> BoxFuture<Response> {
        self.0.call(ctx, req)
    }

    /// Answers `failure` the way the endpoint answers its own failures.
    ///
    /// The server uses this when a request body cannot be read.
    pub(crate) fn fail(&self, ctx: Context, failure: Failure) -> Response {
        self.0.fail(ctx, failure)
    }
}
