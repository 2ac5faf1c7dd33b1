//! Observability subsystem.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries (`logging`)
//! - Provide the narrow log capability the listener announces through (`sink`)
//!
//! # Design Decisions
//! - The library itself never installs a global subscriber; that is the
//!   binary's job
//! - The bound-address announcement goes through an injected [`LogSink`]
//!   so tests can substitute a capturing sink

pub mod logging;
pub mod sink;

pub use sink::{LogSink, TracingSink};
