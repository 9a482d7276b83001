//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, HTTP/1.1 + HTTP/2)
//!     → request.rs (add request ID)
//!     → push transport + push engine
//!     → static files (next stage)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
