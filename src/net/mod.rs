//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (optional TLS handshake, ALPN h2)
//!     → Hand off to HTTP layer
//! ```

pub mod tls;
