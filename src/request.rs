//! Incoming HTTP request type.

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use http_body_util::BodyExt;

/// An incoming HTTP request with its body fully read.
///
/// Cloning is one reference-count increment: every middleware step and the
/// handler receive the same underlying request.
#[derive(Clone, Debug)]
pub struct Request {
    inner: Arc<Parts>,
}

#[derive(Debug)]
struct Parts {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self { inner: Arc::new(Parts { method, uri, headers, body }) }
    }

    /// Reads the whole body off the connection.
    pub(crate) async fn from_hyper(
        req: hyper::Request<hyper::body::Incoming>,
    ) -> Result<Self, hyper::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok(Self::new(parts.method, parts.uri, parts.headers, body))
    }

    pub fn method(&self) -> &Method { &self.inner.method }
    pub fn uri(&self) -> &Uri { &self.inner.uri }
    pub fn path(&self) -> &str { self.inner.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.inner.headers }
    pub fn body(&self) -> &[u8] { &self.inner.body }

    /// Case-insensitive header lookup. Values that are not visible ASCII read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.get(name)?.to_str().ok()
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req: Request = http::Request::builder()
            .method(Method::POST)
            .uri("/factions?dry=1")
            .header("Content-Type", "application/json")
            .body(Bytes::from_static(b"{}"))
            .unwrap()
            .into();

        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(req.header("accept"), None);
        assert_eq!(req.path(), "/factions");
        assert_eq!(*req.method(), Method::POST);
        assert_eq!(req.body(), b"{}");
    }

    #[test]
    fn clones_share_the_request() {
        let req = Request::new(Method::GET, Uri::from_static("/"), HeaderMap::new(), Bytes::new());
        let copy = req.clone();
        assert!(Arc::ptr_eq(&req.inner, &copy.inner));
    }
}
