//! Network layer.
//!
//! # Data Flow
//! ```text
//! Server::start
//!     → listener.rs (async bind, publish BindState, announce address)
//!     → serve loop delegates every request to the engine
//!     → Shutdown trigger ends the loop and releases the port
//!
//! Bind states:
//!     Idle → Binding → Bound → Closed
//!                  ↘ Failed ↙
//! ```

pub mod listener;

pub use listener::{BindState, Listener};
