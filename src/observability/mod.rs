//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Push engine and transport produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (push counters)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
