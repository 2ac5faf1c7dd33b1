//! The request-handling engine contract.
//!
//! # Responsibilities
//! - Define the one-method interface the host delegates every request to
//! - Adapt common shapes (axum `Router`, async closures) to that interface
//!
//! The host never inspects or mutates its engine; routing, middleware, and
//! business logic all live on the engine's side of this boundary.

use std::future::Future;

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

/// A request-handling engine hosted by [`Server`](crate::server::Server).
///
/// One engine per server, supplied at construction, held for the server's
/// lifetime. Every connection accepted by the listener has its requests
/// delegated here.
#[async_trait]
pub trait Engine: Send + Sync + 'static {
    /// Produce a response for one incoming request.
    async fn handle(&self, request: Request) -> Response;
}

/// Any axum application can be hosted directly.
///
/// Dispatch goes through a clone of the router; `Router` is cheap to clone
/// and its service error is `Infallible`.
#[async_trait]
impl Engine for Router {
    async fn handle(&self, request: Request) -> Response {
        match self.clone().oneshot(request).await {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        }
    }
}

/// Adapter turning an async closure into an [`Engine`].
///
/// Useful for tests and single-handler services:
///
/// ```no_run
/// use axum::extract::Request;
/// use axum::response::IntoResponse;
/// use http_host::{EngineFn, Server};
///
/// let engine = EngineFn::new(|_request: Request| async { "hello".into_response() });
/// let server = Server::new(engine);
/// ```
pub struct EngineFn<F>(F);

impl<F> EngineFn<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> Engine for EngineFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    async fn handle(&self, request: Request) -> Response {
        (self.0)(request).await
    }
}
