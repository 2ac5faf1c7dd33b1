//! The listener lifecycle manager.
//!
//! # Responsibilities
//! - Hold exactly one engine and exactly one listener, both fixed at
//!   construction
//! - Wire every accepted request to the engine
//! - Expose fire-and-forget `start`/`stop` with asynchronous outcomes
//!
//! This is a thin composition layer: routing, middleware, and protocol
//! behavior are entirely the engine's business.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::Response;
use axum::Router;

use crate::config::ListenConfig;
use crate::engine::Engine;
use crate::lifecycle::StopHandle;
use crate::net::Listener;
use crate::observability::{LogSink, TracingSink};

/// Binds a request-handling engine to a TCP listener.
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use http_host::Server;
///
/// # async fn run() {
/// let app = Router::new().route("/", get(|| async { "hello" }));
/// let server = Server::new(app);
/// server.start(8080, "0.0.0.0");
/// let addr = server.listener().bound_addr().await.unwrap();
/// # }
/// ```
pub struct Server {
    engine: Arc<dyn Engine>,
    listener: Listener,
}

impl Server {
    /// Create a server around an engine. Does not bind anything.
    pub fn new(engine: impl Engine) -> Self {
        Self::from_shared(Arc::new(engine))
    }

    /// Create a server around an already-shared engine.
    pub fn from_shared(engine: Arc<dyn Engine>) -> Self {
        Self::with_log_sink(engine, Arc::new(TracingSink))
    }

    /// Create a server with an explicit sink for the address announcement.
    pub fn with_log_sink(engine: Arc<dyn Engine>, sink: Arc<dyn LogSink>) -> Self {
        let app = dispatch_router(Arc::clone(&engine));
        Self {
            engine,
            listener: Listener::new(app, sink),
        }
    }

    /// The engine supplied at construction.
    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// The owned listener, for attaching observers.
    ///
    /// The same listener for the server's whole lifetime; `start`/`stop`
    /// never recreate it.
    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    /// Begin an asynchronous bind on `host:port`.
    ///
    /// Non-blocking; returns `&Self` for chaining. The bind outcome is
    /// observable on [`listener`](Self::listener), never returned here.
    pub fn start(&self, port: u16, host: impl Into<String>) -> &Self {
        self.start_with(ListenConfig::new(host, port))
    }

    /// [`start`](Self::start) with the defaults, `localhost:3000`.
    pub fn start_default(&self) -> &Self {
        self.start_with(ListenConfig::default())
    }

    /// Begin an asynchronous bind described by a [`ListenConfig`].
    pub fn start_with(&self, config: ListenConfig) -> &Self {
        self.listener.start(config);
        self
    }

    /// Begin an asynchronous unbind.
    ///
    /// The handle resolves once the address is released. In-flight request
    /// draining follows the HTTP stack's own graceful-shutdown semantics;
    /// no extra guarantee is added here.
    pub fn stop(&self) -> StopHandle {
        self.listener.stop(None)
    }

    /// [`stop`](Self::stop), additionally invoking `callback` exactly once
    /// after a successful unbind.
    pub fn stop_with(&self, callback: impl FnOnce() + Send + 'static) -> StopHandle {
        self.listener.stop(Some(Box::new(callback)))
    }
}

/// Every request accepted by the listener falls through to the engine.
fn dispatch_router(engine: Arc<dyn Engine>) -> Router {
    Router::new().fallback(dispatch).with_state(engine)
}

async fn dispatch(State(engine): State<Arc<dyn Engine>>, request: Request) -> Response {
    engine.handle(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineFn;
    use crate::error::ListenerError;
    use axum::response::IntoResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::net::TcpStream;

    #[derive(Default)]
    struct CapturingSink {
        records: Mutex<Vec<String>>,
    }

    impl LogSink for CapturingSink {
        fn info(&self, message: &str) {
            self.records.lock().unwrap().push(message.to_string());
        }
    }

    fn hello_engine() -> Arc<dyn Engine> {
        Arc::new(EngineFn::new(|_request: Request| async {
            "hello".into_response()
        }))
    }

    #[tokio::test]
    async fn bind_serves_engine_and_announces_once() {
        let sink = Arc::new(CapturingSink::default());
        let server = Server::with_log_sink(hello_engine(), sink.clone());

        server.start(0, "127.0.0.1");
        let addr = server.listener().bound_addr().await.unwrap();

        let body = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "hello");

        let records = sink.records.lock().unwrap().clone();
        assert_eq!(records.len(), 1);
        assert!(records[0].contains("http://127.0.0.1:0"));

        server.stop().wait().await.unwrap();
    }

    #[tokio::test]
    async fn engine_accessor_is_reference_equal() {
        let engine = hello_engine();
        let server = Server::from_shared(Arc::clone(&engine));

        assert!(Arc::ptr_eq(server.engine(), &engine));

        server.start(0, "127.0.0.1");
        server.listener().bound_addr().await.unwrap();
        assert!(Arc::ptr_eq(server.engine(), &engine));

        server.stop().wait().await.unwrap();
        assert!(Arc::ptr_eq(server.engine(), &engine));
    }

    #[tokio::test]
    async fn listener_accessor_is_stable_across_lifecycle() {
        let server = Server::from_shared(hello_engine());
        let before: *const Listener = server.listener();

        server.start(0, "127.0.0.1");
        server.listener().bound_addr().await.unwrap();
        let during: *const Listener = server.listener();

        server.stop().wait().await.unwrap();
        let after: *const Listener = server.listener();

        assert!(std::ptr::eq(before, during));
        assert!(std::ptr::eq(during, after));
    }

    #[tokio::test]
    async fn start_chains() {
        let server = Server::from_shared(hello_engine());

        // One expression: start, then read the engine off the return value.
        let engine = Arc::clone(server.start(0, "127.0.0.1").engine());
        assert!(Arc::ptr_eq(&engine, server.engine()));

        server.listener().bound_addr().await.unwrap();
        server.stop().wait().await.unwrap();
    }

    #[tokio::test]
    async fn stop_callback_runs_once_and_releases_port() {
        let server = Server::from_shared(hello_engine());
        server.start(0, "127.0.0.1");
        let addr = server.listener().bound_addr().await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        server
            .stop_with(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .wait()
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn occupied_port_fails_asynchronously() {
        let first = Server::from_shared(hello_engine());
        first.start(0, "127.0.0.1");
        let addr = first.listener().bound_addr().await.unwrap();

        // start itself does not fail; the error arrives on the listener.
        let second = Server::from_shared(hello_engine());
        second.start(addr.port(), "127.0.0.1");
        let err = second.listener().bound_addr().await.unwrap_err();
        assert!(matches!(err, ListenerError::Bind(_)));

        first.stop().wait().await.unwrap();
    }
}
