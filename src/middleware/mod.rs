//! Middleware steps and ordered chains.
//!
//! A middleware step looks at the request context and the request and either
//! lets it through (`Ok(())`) or stops it with a [`Failure`]. Steps never
//! produce a response value; that is the handler's job.
//!
//! Steps compose into a [`Chain`]. Appending to a chain wraps it:
//!
//! ```text
//! Chain::new()                    → Noop
//!     .append(a)                  → a
//!     .append(b)                  → Then(a, b)
//!     .append(c)                  → Then(Then(a, b), c)
//! ```
//!
//! Running the chain runs `a`, then `b`, then `c`, stopping at the first
//! failure and returning it unchanged. An empty chain succeeds immediately.
//!
//! Built-in steps:
//! - [`trace`] — structured start/finish events with request id, method, path, latency

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::context::Context;
use crate::handler::BoxFuture;
use crate::problem::Failure;
use crate::request::Request;

pub mod trace;

/// A fallible step run before or after an endpoint's handler.
///
/// Implemented for every function of the shape
///
/// ```text
/// async fn name(ctx: Context, req: Request) -> Result<(), Failure>
/// ```
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture<Result<(), Failure>>;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Failure>> + Send + 'static,
{
    fn call(&self, ctx: Context, req: Request) -> BoxFuture<Result<(), Failure>> {
        Box::pin(self(ctx, req))
    }
}

// ── Composition ───────────────────────────────────────────────────────────────

/// The step an empty chain runs.
struct Noop;

impl Middleware for Noop {
    fn call(&self, _ctx: Context, _req: Request) -> BoxFuture<Result<(), Failure>> {
        Box::pin(async { Ok::<(), Failure>(()) })
    }
}

/// Runs `first`; runs `next` only if `first` succeeded.
struct Then {
    first: Arc<dyn Middleware>,
    next: Arc<dyn Middleware>,
}

impl Middleware for Then {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture<Result<(), Failure>> {
        let first = Arc::clone(&self.first);
        let next = Arc::clone(&self.next);
        Box::pin(async move {
            first.call(ctx.clone(), req.clone()).await?;
            next.call(ctx, req).await
        })
    }
}

/// An ordered, short-circuiting sequence of middleware steps.
///
/// Always holds a runnable step: a new chain holds a no-op.
#[derive(Clone)]
pub struct Chain {
    step: Arc<dyn Middleware>,
    len: usize,
}

impl Chain {
    pub fn new() -> Self {
        Self { step: Arc::new(Noop), len: 0 }
    }

    /// Appends `step`. It runs after every step already in the chain.
    pub fn append(self, step: impl Middleware) -> Self {
        let step: Arc<dyn Middleware> = Arc::new(step);
        if self.len == 0 {
            return Self { step, len: 1 };
        }
        Self {
            step: Arc::new(Then { first: self.step, next: step }),
            len: self.len + 1,
        }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Runs every step in append order, stopping at the first failure.
    pub fn run(&self, ctx: Context, req: Request) -> BoxFuture<Result<(), Failure>> {
        self.step.call(ctx, req)
    }
}

impl Middleware for Chain {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture<Result<(), Failure>> {
        self.run(ctx, req)
    }
}

impl Default for Chain {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("len", &self.len).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::problem::Problem;

    type Log = Arc<Mutex<Vec<usize>>>;

    fn request() -> Request {
        http::Request::new(Bytes::new()).into()
    }

    fn record(log: &Log, n: usize) -> impl Middleware + use<> {
        let log = Arc::clone(log);
        move |_ctx: Context, _req: Request| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(n);
                Ok::<(), Failure>(())
            }
        }
    }

    fn reject(log: &Log, n: usize, detail: &'static str) -> impl Middleware + use<> {
        let log = Arc::clone(log);
        move |_ctx: Context, _req: Request| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(n);
                Err(Failure::from(Problem::new(StatusCode::FORBIDDEN, detail)))
            }
        }
    }

    #[tokio::test]
    async fn empty_chain_succeeds() {
        let chain = Chain::new();
        assert!(chain.is_empty());
        assert!(chain.run(Context::new(), request()).await.is_ok());
    }

    #[tokio::test]
    async fn steps_run_in_append_order() {
        let log = Log::default();
        let chain = (0..5).fold(Chain::new(), |chain, n| chain.append(record(&log, n)));

        assert_eq!(chain.len(), 5);
        chain.run(Context::new(), request()).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn first_failure_stops_the_chain() {
        let log = Log::default();
        let chain = Chain::new()
            .append(record(&log, 1))
            .append(reject(&log, 2, "second says no"))
            .append(reject(&log, 3, "third never asked"))
            .append(record(&log, 4));

        let err = chain.run(Context::new(), request()).await.unwrap_err();

        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
        match err {
            Failure::Problem(p) => {
                assert_eq!(p.status, 403);
                assert_eq!(p.detail, "second says no");
            }
            Failure::Opaque(e) => panic!("expected problem, got opaque {e}"),
        }
    }

    #[tokio::test]
    async fn chains_nest_as_steps() {
        let log = Log::default();
        let inner = Chain::new().append(record(&log, 2)).append(record(&log, 3));
        let chain = Chain::new().append(record(&log, 1)).append(inner).append(record(&log, 4));

        chain.run(Context::new(), request()).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn steps_share_the_request_context() {
        #[derive(Clone)]
        struct Caller(String);

        let chain = Chain::new()
            .append(|ctx: Context, _req: Request| async move {
                ctx.insert(Caller("alice".to_owned()));
                Ok::<(), Failure>(())
            })
            .append(|ctx: Context, _req: Request| async move {
                match ctx.get::<Caller>() {
                    Some(Caller(name)) if name == "alice" => Ok(()),
                    _ => Err(Failure::opaque("caller missing")),
                }
            });

        assert!(chain.run(Context::new(), request()).await.is_ok());
    }
}
