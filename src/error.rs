//! Infrastructure error type.

use thiserror::Error as ThisError;

/// The error type returned by bulwark's fallible setup and serving operations.
///
/// Request-level failures never surface here: they are [`Failure`](crate::Failure)s,
/// normalized into a [`Problem`](crate::Problem) response by the endpoint.
/// This type covers what happens around requests: reading configuration,
/// binding a port, accepting connections.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`: {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("config: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display_is_prefixed() {
        let err: Error = std::io::Error::other("address in use").into();
        assert_eq!(err.to_string(), "io: address in use");
    }

    #[test]
    fn invalid_addr_keeps_source() {
        let source = "nope".parse::<std::net::SocketAddr>().unwrap_err();
        let err = Error::InvalidAddr { addr: "nope".to_owned(), source };
        assert!(err.to_string().starts_with("invalid socket address `nope`"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
