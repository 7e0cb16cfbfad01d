//! # bulwark
//!
//! HTTP API endpoints built from three parts: a business handler, ordered
//! middleware chains around it, and an encoder. Every failure comes back to
//! the client as the same problem shape.
//!
//! ## The contract
//!
//! An [`Endpoint`] runs, per request:
//!
//! 1. the before-chain, in the order steps were added,
//! 2. the handler, producing a value,
//! 3. the after-chain, in the order steps were added,
//! 4. the encoder, turning the value into the response body.
//!
//! The first failure anywhere stops the request. It is normalized into a
//! [`Problem`] (`{"title", "detail", "status"}`) and encoded with the same
//! encoder. Handlers that fail with a `Problem` choose their status; any other
//! failure becomes a `500 Internal Server Error` carrying the error message.
//!
//! What bulwark does not do: routing, authentication, persistence. One
//! [`Server`] serves one endpoint.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bulwark::{Context, Endpoint, Failure, JsonEncoder, Problem, Request, Server, TracingSink};
//! use bulwark::middleware::trace;
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bulwark::Error> {
//!     let handler = Endpoint::builder(Arc::new(JsonEncoder), greet)
//!         .with_before(trace::request_started)
//!         .with_before(require_name)
//!         .with_after(trace::request_finished)
//!         .build()
//!         .handler_func(TracingSink);
//!
//!     Server::bind("0.0.0.0:3000")?.serve(handler).await
//! }
//!
//! async fn require_name(_ctx: Context, req: Request) -> Result<(), Failure> {
//!     match req.header("x-name") {
//!         Some(_) => Ok(()),
//!         None => Err(Problem::new(StatusCode::BAD_REQUEST, "x-name header missing").into()),
//!     }
//! }
//!
//! async fn greet(_ctx: Context, req: Request) -> Result<serde_json::Value, Failure> {
//!     let name = req.header("x-name").unwrap_or_default();
//!     Ok(serde_json::json!({ "greeting": format!("hello, {name}") }))
//! }
//! ```

mod config;
mod context;
mod encode;
mod endpoint;
mod error;
mod handler;
mod log;
mod problem;
mod request;
mod response;
mod server;

pub mod faction;
pub mod middleware;

pub use config::{ADDR_VAR, ServerConfig};
pub use context::Context;
pub use encode::{EncodeError, Encoder, JsonEncoder};
pub use endpoint::{Endpoint, EndpointBuilder};
pub use error::Error;
pub use handler::{BoxFuture, HandlerFunc, RequestHandler};
pub use log::{LogSink, TracingSink};
pub use middleware::{Chain, Middleware};
pub use problem::{Failure, Problem, finalize};
pub use request::Request;
pub use response::Response;
pub use server::Server;
