//! Per-request context.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use http::Extensions;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Request-scoped data shared by every middleware step and the handler of one
/// request.
///
/// Holds an id unique within the process, the time the request was received,
/// the peer address when known, and a typed extension map. A before-step can
/// [`insert`](Context::insert) a value that the handler later reads with
/// [`get`](Context::get).
#[derive(Clone, Debug)]
pub struct Context {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    id: u64,
    received_at: Instant,
    remote_addr: Option<SocketAddr>,
    extensions: Mutex<Extensions>,
}

impl Context {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_remote_addr(addr: SocketAddr) -> Self {
        Self::build(Some(addr))
    }

    fn build(remote_addr: Option<SocketAddr>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                received_at: Instant::now(),
                remote_addr,
                extensions: Mutex::new(Extensions::new()),
            }),
        }
    }

    pub fn id(&self) -> u64 { self.inner.id }
    pub fn received_at(&self) -> Instant { self.inner.received_at }
    pub fn remote_addr(&self) -> Option<SocketAddr> { self.inner.remote_addr }

    /// Stores `value`, replacing and returning any previous value of the same type.
    pub fn insert<T: Clone + Send + Sync + 'static>(&self, value: T) -> Option<T> {
        self.inner
            .extensions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(value)
    }

    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.inner
            .extensions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get::<T>()
            .cloned()
    }
}

impl Default for Context {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Caller(&'static str);

    #[test]
    fn ids_are_unique() {
        assert_ne!(Context::new().id(), Context::new().id());
    }

    #[test]
    fn extensions_are_shared_between_clones() {
        let ctx = Context::new();
        let seen_by_handler = ctx.clone();

        assert_eq!(ctx.insert(Caller("alice")), None);
        assert_eq!(seen_by_handler.get::<Caller>(), Some(Caller("alice")));
        assert_eq!(ctx.insert(Caller("bob")), Some(Caller("alice")));
        assert_eq!(seen_by_handler.get::<u32>(), None);
    }

    #[test]
    fn remote_addr_is_kept() {
        let addr: SocketAddr = "10.0.0.7:51234".parse().unwrap();
        assert_eq!(Context::with_remote_addr(addr).remote_addr(), Some(addr));
        assert_eq!(Context::new().remote_addr(), None);
    }
}
