//! Where endpoints report failures they cannot send to the client.

use std::sync::Arc;

use tracing::error;

/// Receives diagnostics for failures that never reach a response body.
///
/// Must not fail and must not block for long: it is called on the request path.
pub trait LogSink: Send + Sync + 'static {
    fn error(&self, message: &str, err: &(dyn std::error::Error + 'static));
}

/// Forwards to `tracing::error!`. The default sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn error(&self, message: &str, err: &(dyn std::error::Error + 'static)) {
        error!(error = %err, "{message}");
    }
}

impl<L: LogSink> LogSink for Arc<L> {
    fn error(&self, message: &str, err: &(dyn std::error::Error + 'static)) {
        (**self).error(message, err);
    }
}
