//! Minimal bulwark demo — a faction-creating JSON endpoint.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -X POST http://localhost:3000/ \
//!        -H 'content-type: application/json' \
//!        -d '{"title":"foo","description":"bar"}'
//!   curl -X POST http://localhost:3000/ -d 'not json'              # 415
//!   curl -X POST http://localhost:3000/ \
//!        -H 'content-type: application/json' -d '{"title":" "}'    # 422

use std::sync::Arc;

use bulwark::faction::fake::FakeRepository;
use bulwark::faction::{Complete, Incomplete, Manager};
use bulwark::middleware::trace;
use bulwark::{
    BoxFuture, Context, Endpoint, Failure, HandlerFunc, JsonEncoder, Problem, Request, Server,
    ServerConfig, TracingSink,
};
use http::StatusCode;

#[tokio::main]
async fn main() -> Result<(), bulwark::Error> {
    tracing_subscriber::fmt::init();

    let create = CreateFaction { manager: Arc::new(Manager::new(FakeRepository::new())) };

    let handler = Endpoint::builder(Arc::new(JsonEncoder), create)
        .with_before(trace::request_started)
        .with_before(require_json)
        .with_after(trace::request_finished)
        .build()
        .handler_func(TracingSink);

    Server::from_config(ServerConfig::from_env()?).serve(handler).await
}

// Rejects bodies that do not declare themselves as JSON.
async fn require_json(_ctx: Context, req: Request) -> Result<(), Failure> {
    match req.header("content-type") {
        Some(ct) if ct.starts_with("application/json") => Ok(()),
        _ => Err(Problem::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected application/json").into()),
    }
}

// Stateful handler: holds the manager, so it implements HandlerFunc by hand.
struct CreateFaction {
    manager: Arc<Manager<FakeRepository>>,
}

impl HandlerFunc for CreateFaction {
    type Output = Complete;

    fn call(&self, ctx: Context, req: Request) -> BoxFuture<Result<Complete, Failure>> {
        let manager = Arc::clone(&self.manager);
        Box::pin(async move {
            let incomplete: Incomplete = serde_json::from_slice(req.body())
                .map_err(|e| Problem::new(StatusCode::BAD_REQUEST, e.to_string()))?;
            manager.create(&ctx, incomplete).await
        })
    }
}
