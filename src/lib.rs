//! HTTP/2 server push orchestration.
//!
//! A middleware stage that pushes configured resources when a request path
//! matches a rule, and pushes same-origin targets advertised by the
//! response's preload `Link` headers.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod push;
pub mod routing;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use push::{PushCapability, PushEngine, Pusher};
