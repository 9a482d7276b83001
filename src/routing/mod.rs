//! Request path routing for push rules.
//!
//! # Data Flow
//! ```text
//! Request path + Rule pattern
//!     → matcher.rs (prefix match)
//!     → index.rs (directory → index file path, at most once per request)
//!     → matcher.rs (prefix match against the index path)
//! ```
//!
//! # Design Decisions
//! - No regex in hot path (prefix matching only)
//! - Index resolution never leaves the document root

pub mod index;
pub mod matcher;

pub use index::{FsIndexResolver, IndexResolver};
pub use matcher::PathMatcher;
