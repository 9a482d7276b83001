//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile rules → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → Shutdown::trigger → server drains → Exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{recv_shutdown, Shutdown};
pub use signals::wait_for_signal;
