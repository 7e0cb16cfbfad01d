//! Request tracing steps.
//!
//! ```rust,no_run
//! use bulwark::{Context, Endpoint, Failure, JsonEncoder, Request};
//! use bulwark::middleware::trace;
//! use std::sync::Arc;
//!
//! async fn ping(_ctx: Context, _req: Request) -> Result<&'static str, Failure> {
//!     Ok("pong")
//! }
//!
//! let endpoint = Endpoint::builder(Arc::new(JsonEncoder), ping)
//!     .with_before(trace::request_started)
//!     .with_after(trace::request_finished)
//!     .build();
//! ```
//!
//! `request_finished` runs as an after-step, so it only fires for requests
//! whose handler succeeded. Failed requests are reported by the endpoint.

use std::time::Duration;

use tracing::info;

use crate::context::Context;
use crate::problem::Failure;
use crate::request::Request;

pub async fn request_started(ctx: Context, req: Request) -> Result<(), Failure> {
    info!(
        request_id = ctx.id(),
        method = %req.method(),
        path = req.path(),
        "request started"
    );
    Ok(())
}

pub async fn request_finished(ctx: Context, req: Request) -> Result<(), Failure> {
    let latency = ctx.received_at().elapsed();
    info!(
        request_id = ctx.id(),
        method = %req.method(),
        path = req.path(),
        latency_us = micros(latency),
        "request finished"
    );
    Ok(())
}

/// Whole microseconds in `d`, saturating at `u64::MAX`.
fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::middleware::Chain;

    #[tokio::test]
    async fn trace_steps_never_fail() {
        let chain = Chain::new().append(request_started).append(request_finished);
        let req: Request = http::Request::new(Bytes::new()).into();
        assert!(chain.run(Context::new(), req).await.is_ok());
    }

    #[test]
    fn latency_saturates_instead_of_wrapping() {
        assert_eq!(micros(Duration::from_millis(3)), 3_000);
        assert_eq!(micros(Duration::MAX), u64::MAX);
    }
}
