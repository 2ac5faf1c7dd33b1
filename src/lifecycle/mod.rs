//! Lifecycle coordination.
//!
//! # Data Flow
//! ```text
//! start:
//!     Server::start → Listener binds → BindState::Bound published
//!
//! stop (shutdown.rs, stop.rs):
//!     Server::stop → Shutdown::trigger → serve loop stops accepting
//!         → drains per the HTTP stack's own semantics
//!         → BindState::Closed published → StopHandle resolves
//! ```
//!
//! Signal handling is deliberately absent: installing handlers is the
//! caller's decision (see the demo binary).

pub mod shutdown;
pub mod stop;

pub use shutdown::Shutdown;
pub use stop::StopHandle;
