//! Response encoders.
//!
//! An [`Encoder`] turns a value into a response body and labels it with a
//! content type. Endpoints use the same encoder for success values and for
//! [`Problem`](crate::Problem)s.

use http::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use thiserror::Error as ThisError;

use crate::response::Response;

/// Serializes values into a [`Response`].
///
/// Implementations must serialize fully before touching `sink`: on `Err` the
/// sink is left exactly as it was.
pub trait Encoder: Send + Sync + 'static {
    fn encode<T: Serialize + ?Sized>(&self, sink: &mut Response, value: &T) -> Result<(), EncodeError>;
}

/// Why an encoder could not produce a body.
#[derive(Debug, ThisError)]
pub enum EncodeError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

// ── JSON ──────────────────────────────────────────────────────────────────────

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// JSON encoder for API endpoints.
///
/// Bodies are newline-terminated, content type `application/json; charset=utf-8`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for JsonEncoder {
    fn encode<T: Serialize + ?Sized>(&self, sink: &mut Response, value: &T) -> Result<(), EncodeError> {
        let mut body = serde_json::to_vec(value)?;
        body.push(b'\n');
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        sink.set_body(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn json_sets_body_and_content_type() {
        let mut sink = Response::new();
        JsonEncoder.encode(&mut sink, &serde_json::json!({"foo": "bar"})).unwrap();

        assert_eq!(sink.content_type(), Some("application/json; charset=utf-8"));
        assert_eq!(sink.body(), b"{\"foo\":\"bar\"}\n");
    }

    #[test]
    fn json_failure_leaves_sink_untouched() {
        let mut sink = Response::new();
        let err = JsonEncoder.encode(&mut sink, &Unserializable).unwrap_err();

        assert!(matches!(err, EncodeError::Json(_)));
        assert!(err.to_string().contains("refusing to serialize"));
        assert!(sink.content_type().is_none());
        assert!(sink.body().is_empty());
    }
}
