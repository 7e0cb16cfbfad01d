//! Server configuration.
//!
//! ## Environment variables
//!
//! ### `BULWARK_ADDR`
//!
//! Socket address to listen on, `host:port`. Default: `0.0.0.0:3000`.
//!
//! ```bash
//! BULWARK_ADDR=127.0.0.1:8080 cargo run --example basic
//! ```

use std::net::SocketAddr;

use crate::error::Error;

pub const ADDR_VAR: &str = "BULWARK_ADDR";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    ///
    /// An unset variable yields the default; a value that does not parse is
    /// an [`Error::Config`] naming the variable.
    pub fn from_env() -> Result<Self, Error> {
        match std::env::var(ADDR_VAR) {
            Ok(value) => {
                Self::from_addr(&value).map_err(|e| Error::Config(format!("{ADDR_VAR}: {e}")))
            }
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(Error::Config(format!("{ADDR_VAR} is not valid unicode")))
            }
        }
    }

    pub fn from_addr(addr: &str) -> Result<Self, Error> {
        let addr = addr.trim();
        let parsed = addr
            .parse()
            .map_err(|source| Error::InvalidAddr { addr: addr.to_owned(), source })?;
        Ok(Self { addr: parsed })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: SocketAddr::from(([0, 0, 0, 0], 3000)) }
    }
}
