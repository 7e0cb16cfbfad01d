//! Endpoints: one handler, its middleware chains, and an encoder.
//!
//! # Request flow
//!
//! ```text
//! before-chain ──ok──▶ handler ──ok(value)──▶ after-chain ──ok──▶ encode(value)
//!      │                  │                        │                   │
//!      └──────err─────────┴───────────err──────────┘             err (logged)
//!                         ▼                                            │
//!                  finalize → Problem ◀────────────────────────────────┘
//!                         ▼
//!               status = problem.status, encode(problem)
//!                         │ err (logged)
//!                         ▼
//!               bare 500, no body
//! ```
//!
//! Encoders serialize before touching the response, so a failed success
//! encode leaves nothing half-written and is answered with a 500 problem like
//! any other failure. Only a problem that itself cannot be encoded falls back
//! to a bare status line.
//!
//! # Setup vs. serving
//!
//! Middleware is attached on an [`EndpointBuilder`]. [`build`](EndpointBuilder::build)
//! produces an immutable [`Endpoint`]; nothing on the request path can change
//! it, so a single endpoint serves any number of concurrent requests without
//! locking.

use std::sync::Arc;

use http::StatusCode;
use tracing::debug;

use crate::context::Context;
use crate::encode::Encoder;
use crate::handler::{BoxFuture, ErasedHandler, HandlerFunc, RequestHandler};
use crate::log::LogSink;
use crate::middleware::{Chain, Middleware};
use crate::problem::{Failure, finalize};
use crate::request::Request;
use crate::response::Response;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Collects middleware for an endpoint. Obtain via [`Endpoint::builder`].
pub struct EndpointBuilder<E, H> {
    encoder: Arc<E>,
    handler: H,
    before: Chain,
    after: Chain,
}

impl<E: Encoder, H: HandlerFunc> EndpointBuilder<E, H> {
    /// Runs `step` before the handler, after every before-step added so far.
    pub fn with_before(self, step: impl Middleware) -> Self {
        Self { before: self.before.append(step), ..self }
    }

    /// Runs `step` after the handler, after every after-step added so far.
    pub fn with_after(self, step: impl Middleware) -> Self {
        Self { after: self.after.append(step), ..self }
    }

    pub fn build(self) -> Endpoint<E, H> {
        Endpoint {
            encoder: self.encoder,
            handler: self.handler,
            before: self.before,
            after: self.after,
        }
    }
}

// ── Endpoint ──────────────────────────────────────────────────────────────────

/// A handler bound to its middleware and encoder.
///
/// ```rust
/// use std::sync::Arc;
/// use bulwark::{Context, Endpoint, Failure, JsonEncoder, Problem, Request, TracingSink};
/// use http::StatusCode;
///
/// async fn require_json(_ctx: Context, req: Request) -> Result<(), Failure> {
///     match req.header("content-type") {
///         Some(ct) if ct.starts_with("application/json") => Ok(()),
///         _ => Err(Problem::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected json").into()),
///     }
/// }
///
/// async fn echo(_ctx: Context, req: Request) -> Result<serde_json::Value, Failure> {
///     serde_json::from_slice(req.body())
///         .map_err(|e| Problem::new(StatusCode::BAD_REQUEST, e.to_string()).into())
/// }
///
/// let handler = Endpoint::builder(Arc::new(JsonEncoder), echo)
///     .with_before(require_json)
///     .build()
///     .handler_func(TracingSink);
/// ```
pub struct Endpoint<E, H> {
    encoder: Arc<E>,
    handler: H,
    before: Chain,
    after: Chain,
}

impl<E: Encoder, H: HandlerFunc> Endpoint<E, H> {
    /// Starts an endpoint with empty before- and after-chains.
    ///
    /// The encoder is shared: pass clones of one `Arc` to every endpoint that
    /// should use it.
    pub fn builder(encoder: Arc<E>, handler: H) -> EndpointBuilder<E, H> {
        EndpointBuilder { encoder, handler, before: Chain::new(), after: Chain::new() }
    }

    /// Produces the request handler a server can call.
    ///
    /// `log` receives encoding failures; every other failure is answered with
    /// a problem body and not logged there.
    pub fn handler_func(self, log: impl LogSink) -> RequestHandler {
        RequestHandler::new(Bound { endpoint: Arc::new(self), log: Arc::new(log) })
    }

    /// Handles one request. Never fails: every failure becomes a response.
    pub async fn handle(&self, ctx: Context, req: Request, log: &dyn LogSink) -> Response {
        let mut res = Response::new();
        match self.run(ctx, req).await {
            Ok(value) => {
                if let Err(e) = self.encoder.encode(&mut res, &value) {
                    log.error("encoding response failed", &e);
                    self.encode_error(&mut res, e.into(), log);
                }
            }
            Err(failure) => self.encode_error(&mut res, failure, log),
        }
        res
    }

    async fn run(&self, ctx: Context, req: Request) -> Result<H::Output, Failure> {
        self.before.run(ctx.clone(), req.clone()).await?;
        let value = self.handler.call(ctx.clone(), req.clone()).await?;
        self.after.run(ctx, req).await?;
        Ok(value)
    }

    /// Answers a request that failed before it reached this endpoint, using
    /// the same encoder and log sink as any other failure.
    pub fn reject(&self, failure: Failure, log: &dyn LogSink) -> Response {
        let mut res = Response::new();
        self.encode_error(&mut res, failure, log);
        res
    }

    fn encode_error(&self, res: &mut Response, failure: Failure, log: &dyn LogSink) {
        let problem = finalize(failure);
        debug!(status = problem.status, detail = %problem.detail, "request failed");

        res.set_status(problem.status_code());
        if let Err(e) = self.encoder.encode(res, &problem) {
            res.write_status(StatusCode::INTERNAL_SERVER_ERROR);
            log.error(&format!("encoding failed for problem {problem}"), &e);
        }
    }
}

/// An endpoint paired with its log sink, erased behind [`RequestHandler`].
struct Bound<E, H, L> {
    endpoint: Arc<Endpoint<E, H>>,
    log: Arc<L>,
}

impl<E: Encoder, H: HandlerFunc, L: LogSink> ErasedHandler for Bound<E, H, L> {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture<Response> {
        let endpoint = Arc::clone(&self.endpoint);
        let log = Arc::clone(&self.log);
        Box::pin(async move { endpoint.handle(ctx, req, &*log).await })
    }

    fn fail(&self, _ctx: Context, failure: Failure) -> Response {
        self.endpoint.reject(failure, &*self.log)
    }
}
