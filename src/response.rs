//! Outgoing HTTP response, used as the encoder's output sink.
//!
//! A [`Response`] starts as an empty `200 OK`. Encoders write a body and a
//! `content-type` into it; the endpoint sets the status when it writes a
//! problem. Nothing leaves the process until the server converts it with
//! [`Response::into_inner`].

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

/// An outgoing HTTP response under construction.
#[derive(Debug, Default)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Empty `200 OK`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self { status: code, ..Self::default() }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The `content-type` header, if one has been set and is valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }

    pub fn set_status(&mut self, code: StatusCode) {
        self.status = code;
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Discards everything written so far and leaves a bare status line.
    ///
    /// Cannot fail. The endpoint uses it when even the problem body could not
    /// be encoded.
    pub fn write_status(&mut self, code: StatusCode) {
        *self = Self::status(code);
    }

    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty_ok() {
        let res = Response::new();
        assert_eq!(res.status_code(), StatusCode::OK);
        assert!(res.body().is_empty());
        assert!(res.content_type().is_none());
    }

    #[test]
    fn write_status_discards_partial_output() {
        let mut res = Response::new();
        res.set_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        res.set_body(&b"{\"half\":"[..]);

        res.write_status(StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.headers().is_empty());
        assert!(res.body().is_empty());
    }

    #[test]
    fn into_inner_carries_status_and_headers() {
        let mut res = Response::status(StatusCode::CREATED);
        res.set_header(http::header::LOCATION, HeaderValue::from_static("/factions/foo"));
        let inner = res.into_inner();
        assert_eq!(inner.status(), StatusCode::CREATED);
        assert_eq!(inner.headers()[http::header::LOCATION], "/factions/foo");
    }
}
