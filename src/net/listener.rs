//! Listener with an observable bound/unbound lifecycle.
//!
//! # Responsibilities
//! - Bind to a requested address, asynchronously to the caller
//! - Publish bind/unbind outcomes on a watch channel
//! - Emit one informational record with the address on successful bind
//! - Run the serve loop until shutdown is triggered
//!
//! The listener is created once, at server construction, and never
//! recreated; `start`/`stop` only toggle its bound state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};

use crate::config::ListenConfig;
use crate::error::ListenerError;
use crate::lifecycle::{Shutdown, StopHandle};
use crate::observability::LogSink;

/// Bound-state of the listener, published on its state channel.
///
/// Bind and unbind outcomes are events, never synchronous returns:
/// collaborators observe them through [`Listener::subscribe`] or the
/// convenience waiters below.
#[derive(Debug, Clone)]
pub enum BindState {
    /// Created, no bind requested yet.
    Idle,
    /// Bind requested, socket not yet listening.
    Binding,
    /// Listening on the resolved address.
    Bound(SocketAddr),
    /// Bind or serve failed; terminal.
    Failed(ListenerError),
    /// Address released after a stop; terminal.
    Closed,
}

impl BindState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Closed)
    }
}

struct Shared {
    /// Service wired to the engine at construction. Cloned per start.
    app: Router,
    state: watch::Sender<BindState>,
    shutdown: Shutdown,
    sink: Arc<dyn LogSink>,
}

/// The owned network listener.
///
/// External collaborators may hold a reference to attach observers via
/// [`subscribe`](Self::subscribe); binding and closing are reserved to the
/// owning server.
pub struct Listener {
    inner: Arc<Shared>,
}

impl Listener {
    pub(crate) fn new(app: Router, sink: Arc<dyn LogSink>) -> Self {
        let (state, _) = watch::channel(BindState::Idle);
        Self {
            inner: Arc::new(Shared {
                app,
                state,
                shutdown: Shutdown::new(),
                sink,
            }),
        }
    }

    /// Snapshot of the current bound-state.
    pub fn state(&self) -> BindState {
        self.inner.state.borrow().clone()
    }

    /// Observe bound-state transitions.
    pub fn subscribe(&self) -> watch::Receiver<BindState> {
        self.inner.state.subscribe()
    }

    /// Wait for the pending bind to settle.
    ///
    /// Resolves with the actually-bound address, or with the bind error the
    /// listener published. `NotRunning` if no bind was ever requested and
    /// the listener already closed.
    pub async fn bound_addr(&self) -> Result<SocketAddr, ListenerError> {
        let mut rx = self.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            match current {
                BindState::Bound(addr) => return Ok(addr),
                BindState::Failed(err) => return Err(err),
                BindState::Closed => return Err(ListenerError::NotRunning),
                BindState::Idle | BindState::Binding => {}
            }
            if rx.changed().await.is_err() {
                return Err(ListenerError::Interrupted);
            }
        }
    }

    /// Begin an asynchronous bind and serve loop.
    ///
    /// Returns immediately. The outcome is published on the state channel;
    /// on success one informational record with the address is emitted
    /// through the sink. A re-entrant start while not `Idle` is rejected
    /// with a warning and no state change.
    pub(crate) fn start(&self, config: ListenConfig) {
        // Claim Idle → Binding atomically so racing starts cannot both
        // spawn a bind task.
        let mut claimed = false;
        self.inner.state.send_if_modified(|state| {
            if matches!(state, BindState::Idle) {
                *state = BindState::Binding;
                claimed = true;
            }
            claimed
        });
        if !claimed {
            tracing::warn!(
                host = %config.host,
                port = config.port,
                "start ignored: listener already started"
            );
            return;
        }

        // Subscribe before spawning so a stop issued right after start is
        // not lost.
        let mut shutdown_rx = self.inner.shutdown.subscribe();
        let shared = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let listener = match TcpListener::bind((config.host.as_str(), config.port)).await {
                Ok(listener) => listener,
                Err(err) => {
                    shared
                        .state
                        .send_replace(BindState::Failed(ListenerError::bind(err)));
                    return;
                }
            };
            let addr = match listener.local_addr() {
                Ok(addr) => addr,
                Err(err) => {
                    shared
                        .state
                        .send_replace(BindState::Failed(ListenerError::bind(err)));
                    return;
                }
            };

            shared.state.send_replace(BindState::Bound(addr));
            shared.sink.info(&announcement(&config));

            let app = shared.app.clone();
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await;

            let terminal = match served {
                Ok(()) => BindState::Closed,
                Err(err) => BindState::Failed(ListenerError::serve(err)),
            };
            shared.state.send_replace(terminal);
        });
    }

    /// Begin an asynchronous unbind.
    ///
    /// Returns immediately with a handle that resolves once the address is
    /// released. A stop while idle or already closed resolves the handle
    /// with `NotRunning`. The callback, when present, runs exactly once
    /// after a successful unbind; failures surface only on the handle.
    pub(crate) fn stop(&self, callback: Option<Box<dyn FnOnce() + Send>>) -> StopHandle {
        let (tx, rx) = oneshot::channel();
        let shared = Arc::clone(&self.inner);
        let mut state_rx = self.inner.state.subscribe();

        tokio::spawn(async move {
            // Snapshot before awaiting; the watch guard must not live
            // across an await point.
            let current = state_rx.borrow_and_update().clone();
            let outcome = match current {
                BindState::Binding | BindState::Bound(_) => {
                    shared.shutdown.trigger();
                    tracing::debug!(
                        subscribers = shared.shutdown.receiver_count(),
                        "shutdown triggered"
                    );
                    wait_closed(&mut state_rx).await
                }
                BindState::Idle | BindState::Closed => Err(ListenerError::NotRunning),
                BindState::Failed(err) => Err(err),
            };

            if outcome.is_ok() {
                if let Some(callback) = callback {
                    callback();
                }
            }
            let _ = tx.send(outcome);
        });

        StopHandle::new(rx)
    }
}

async fn wait_closed(rx: &mut watch::Receiver<BindState>) -> Result<(), ListenerError> {
    loop {
        let current = rx.borrow_and_update().clone();
        match current {
            BindState::Closed => return Ok(()),
            BindState::Failed(err) => return Err(err),
            _ => {}
        }
        if rx.changed().await.is_err() {
            return Err(ListenerError::Interrupted);
        }
    }
}

/// The single informational record emitted on successful bind.
///
/// Uses the requested host and port, not the resolved socket address, so
/// the printed URL matches what the caller asked for.
fn announcement(config: &ListenConfig) -> String {
    format!("[SERVER] Address: http://{}:{}", config.host, config.port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::TracingSink;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn idle_listener() -> Listener {
        Listener::new(Router::new(), Arc::new(TracingSink))
    }

    #[derive(Default)]
    struct CountingSink {
        records: AtomicUsize,
    }

    impl LogSink for CountingSink {
        fn info(&self, _message: &str) {
            self.records.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn announcement_uses_requested_address() {
        assert_eq!(
            announcement(&ListenConfig::default()),
            "[SERVER] Address: http://localhost:3000"
        );
        assert_eq!(
            announcement(&ListenConfig::new("0.0.0.0", 8080)),
            "[SERVER] Address: http://0.0.0.0:8080"
        );
    }

    #[tokio::test]
    async fn bind_then_stop_walks_the_state_machine() {
        let listener = idle_listener();
        assert!(matches!(listener.state(), BindState::Idle));

        listener.start(ListenConfig::new("127.0.0.1", 0));
        let addr = listener.bound_addr().await.unwrap();
        assert_ne!(addr.port(), 0);
        assert!(matches!(listener.state(), BindState::Bound(_)));

        listener.stop(None).wait().await.unwrap();
        assert!(matches!(listener.state(), BindState::Closed));
    }

    #[tokio::test]
    async fn stop_before_start_is_not_running() {
        let listener = idle_listener();
        let outcome = listener.stop(None).wait().await;
        assert!(matches!(outcome, Err(ListenerError::NotRunning)));
    }

    #[tokio::test]
    async fn double_stop_is_not_running() {
        let listener = idle_listener();
        listener.start(ListenConfig::new("127.0.0.1", 0));
        listener.bound_addr().await.unwrap();

        listener.stop(None).wait().await.unwrap();
        let second = listener.stop(None).wait().await;
        assert!(matches!(second, Err(ListenerError::NotRunning)));
    }

    #[tokio::test]
    async fn restart_after_close_is_rejected() {
        let listener = idle_listener();
        listener.start(ListenConfig::new("127.0.0.1", 0));
        listener.bound_addr().await.unwrap();
        listener.stop(None).wait().await.unwrap();

        // Rejected with a warning; terminal state is untouched.
        listener.start(ListenConfig::new("127.0.0.1", 0));
        assert!(matches!(listener.state(), BindState::Closed));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_starts_claim_the_listener_once() {
        let sink = Arc::new(CountingSink::default());
        let listener = Arc::new(Listener::new(Router::new(), sink.clone()));

        let racers: Vec<_> = (0..2)
            .map(|_| {
                let listener = Arc::clone(&listener);
                tokio::spawn(async move {
                    listener.start(ListenConfig::new("127.0.0.1", 0));
                })
            })
            .collect();
        for racer in racers {
            racer.await.unwrap();
        }

        listener.bound_addr().await.unwrap();
        // The announcement follows the Bound transition in the serve task;
        // give it a beat before counting.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(sink.records.load(Ordering::SeqCst), 1);

        listener.stop(None).wait().await.unwrap();
    }

    #[tokio::test]
    async fn bind_conflict_surfaces_asynchronously() {
        let first = idle_listener();
        first.start(ListenConfig::new("127.0.0.1", 0));
        let addr = first.bound_addr().await.unwrap();

        let second = idle_listener();
        second.start(ListenConfig::new("127.0.0.1", addr.port()));
        let err = second.bound_addr().await.unwrap_err();
        assert!(err.is_bind());

        first.stop(None).wait().await.unwrap();
    }
}
