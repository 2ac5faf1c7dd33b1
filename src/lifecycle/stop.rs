//! Awaitable handle for unbind completion.

use tokio::sync::oneshot;

use crate::error::ListenerError;

/// Result of a stop request.
///
/// `stop` itself is fire-and-forget; this handle is how the caller observes
/// the asynchronous outcome. Dropping it detaches from the outcome without
/// cancelling the shutdown.
#[derive(Debug)]
pub struct StopHandle {
    rx: oneshot::Receiver<Result<(), ListenerError>>,
}

impl StopHandle {
    pub(crate) fn new(rx: oneshot::Receiver<Result<(), ListenerError>>) -> Self {
        Self { rx }
    }

    /// Wait until the listener has released its bound address.
    pub async fn wait(self) -> Result<(), ListenerError> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(ListenerError::Interrupted),
        }
    }
}
