//! Error types for the listener lifecycle.

use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced on the listener's state channel or through a [`StopHandle`].
///
/// Bind and serve failures are asynchronous by contract: `start` never fails
/// synchronously, so the underlying I/O error rides the watch channel. The
/// `Arc` wrapper keeps the variants `Clone` for that channel.
///
/// [`StopHandle`]: crate::lifecycle::StopHandle
#[derive(Debug, Clone, Error)]
pub enum ListenerError {
    /// The listener could not bind to the requested address.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] Arc<io::Error>),

    /// The serve loop ended with an I/O error after a successful bind.
    #[error("serve error: {0}")]
    Serve(#[source] Arc<io::Error>),

    /// A stop was requested but the listener was never started, or it
    /// already released its address.
    #[error("listener is not running")]
    NotRunning,

    /// The serve task went away without reporting an outcome
    /// (runtime shut down underneath it).
    #[error("serve task interrupted")]
    Interrupted,
}

impl ListenerError {
    pub(crate) fn bind(err: io::Error) -> Self {
        Self::Bind(Arc::new(err))
    }

    pub(crate) fn serve(err: io::Error) -> Self {
        Self::Serve(Arc::new(err))
    }

    /// True when the error is an address-level bind failure.
    pub fn is_bind(&self) -> bool {
        matches!(self, Self::Bind(_))
    }
}
