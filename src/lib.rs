//! http-host: a lifecycle wrapper that binds a request-handling engine to a
//! TCP listener.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                 http-host                    │
//!                 │                                              │
//!   start/stop ───┼─▶ server ──▶ net::listener ──▶ lifecycle     │
//!                 │      │        (bind state,      (shutdown,   │
//!                 │      │         serve loop)       stop handle)│
//!                 │      ▼                                       │
//!   requests ─────┼─▶ engine (external: router, closure, ...)    │
//!                 │                                              │
//!                 │   cross-cutting: config, observability       │
//!                 └──────────────────────────────────────────────┘
//! ```
//!
//! The crate owns exactly one thing: the bound/unbound lifecycle of a
//! listener. Everything a request becomes after it is accepted belongs to
//! the [`Engine`] supplied at construction. `start` and `stop` are both
//! non-blocking; their outcomes are events on the listener's state channel
//! and the [`StopHandle`].

// Core
pub mod engine;
pub mod error;
pub mod net;
pub mod server;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ListenConfig;
pub use engine::{Engine, EngineFn};
pub use error::ListenerError;
pub use lifecycle::{Shutdown, StopHandle};
pub use net::{BindState, Listener};
pub use observability::{LogSink, TracingSink};
pub use server::Server;
