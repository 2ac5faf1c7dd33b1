//! Narrow logging capability for the bound-address announcement.

/// Sink for the single informational record the listener emits on bind.
///
/// Injected at server construction; defaults to [`TracingSink`]. Tests swap
/// in a capturing implementation to assert on emitted records.
pub trait LogSink: Send + Sync + 'static {
    /// Emit one informational record.
    fn info(&self, message: &str);
}

/// Default sink: forwards to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }
}
