//! Problem responses and failure normalization.
//!
//! Every failure raised by a middleware step or a handler is a [`Failure`].
//! Before anything reaches the client it goes through [`finalize`], which
//! turns it into exactly one [`Problem`] with a valid HTTP status:
//!
//! ```text
//! Failure::Problem(p)   status in 100..=999  →  p, unchanged
//! Failure::Problem(p)   any other status     →  p with status 500
//! Failure::Opaque(err)                       →  { "Internal Server Error", err.to_string(), 500 }
//! ```

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::encode::EncodeError;

// ── Problem ───────────────────────────────────────────────────────────────────

/// A normalized, client-facing failure.
///
/// Wire shape: `{"title": "...", "detail": "...", "status": 401}`.
///
/// A status of `0` means "unset". [`finalize`] replaces it, and any other
/// value HTTP cannot carry, with 500 before the problem is encoded.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{title} ({status}): {detail}")]
pub struct Problem {
    pub title: String,
    pub detail: String,
    pub status: u16,
}

impl Problem {
    /// Problem titled with the standard reason phrase of `status`.
    ///
    /// ```rust
    /// use bulwark::Problem;
    /// use http::StatusCode;
    ///
    /// let p = Problem::new(StatusCode::UNAUTHORIZED, "missing token");
    /// assert_eq!(p.title, "Unauthorized");
    /// assert_eq!(p.status, 401);
    /// ```
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            title: status.canonical_reason().unwrap_or_default().to_owned(),
            detail: detail.into(),
            status: status.as_u16(),
        }
    }

    /// Problem with an explicit title and raw status. `status` may be `0`.
    pub fn with_title(title: impl Into<String>, detail: impl Into<String>, status: u16) -> Self {
        Self { title: title.into(), detail: detail.into(), status }
    }

    /// `500 Internal Server Error` with `detail`.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    /// The status as a typed code. Unset or out-of-range values read as 500.
    ///
    /// A finalized problem always has a status that converts as-is.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

// ── Failure ───────────────────────────────────────────────────────────────────

/// What a middleware step or handler returns when it cannot continue.
///
/// Either already problem-shaped, or an arbitrary error whose message becomes
/// the detail of a generic 500.
#[derive(Debug, ThisError)]
pub enum Failure {
    #[error(transparent)]
    Problem(#[from] Problem),

    #[error(transparent)]
    Opaque(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Failure {
    /// Wrap any error (or a plain message) as an opaque failure.
    ///
    /// ```rust
    /// use bulwark::Failure;
    ///
    /// let f = Failure::opaque("disk full");
    /// assert_eq!(f.to_string(), "disk full");
    /// ```
    pub fn opaque(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Opaque(err.into())
    }
}

impl From<EncodeError> for Failure {
    fn from(e: EncodeError) -> Self {
        Self::opaque(e)
    }
}

// ── Normalization ─────────────────────────────────────────────────────────────

/// Maps any failure onto the problem the client will receive.
///
/// The returned status always matches the HTTP status line the endpoint writes.
pub fn finalize(failure: Failure) -> Problem {
    match failure {
        Failure::Problem(mut p) => {
            if StatusCode::from_u16(p.status).is_err() {
                p.status = StatusCode::INTERNAL_SERVER_ERROR.as_u16();
            }
            p
        }
        Failure::Opaque(e) => Problem::internal(e.to_string()),
    }
}
