//! HTTP/2 server push subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → transport.rs (attach PushCapability on HTTP/2)
//!     → engine.rs (recursion guard, proxied headers)
//!         → rules.rs + routing (match configured rules, push resources)
//!         → next stage (real response)
//!         → link.rs (push preload targets from Link headers)
//!     → Response returned unchanged
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - A failed push ends the current phase, never the request
//! - Pushed requests carry a marker header so they never push again

pub mod engine;
pub mod headers;
pub mod link;
pub mod pusher;
pub mod rules;
pub mod transport;

pub use engine::{push_middleware, PushEngine};
pub use headers::{merge_headers, proxied_headers, PROXIED_HEADERS, PUSH_MARKER};
pub use link::LinkEntry;
pub use pusher::{PushCapability, PushError, PushOptions, Pusher};
pub use rules::{compile_rules, Resource, Rule, RuleError};
pub use transport::{advertise_push, BudgetedPusher, PushSink, PushTransport, TracingSink};
