//! Metrics collection and exposition.
//!
//! # Metrics
//! - `push_attempts_total` (counter): push attempts by phase and outcome
//! - `push_phase_aborted_total` (counter): phases cut short by a failed push
//! - `push_links_skipped_total` (counter): `Link` entries not pushed, by reason
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are static strings only

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Which part of the request pipeline issued a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPhase {
    /// Pushes from configured rules, before the response is produced.
    Rules,
    /// Pushes from `Link` headers on the produced response.
    Links,
}

impl PushPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushPhase::Rules => "rules",
            PushPhase::Links => "links",
        }
    }
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_push(phase: PushPhase, success: bool) {
    let outcome = if success { "pushed" } else { "failed" };
    ::metrics::counter!(
        "push_attempts_total",
        "phase" => phase.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_phase_aborted(phase: PushPhase) {
    ::metrics::counter!("push_phase_aborted_total", "phase" => phase.as_str()).increment(1);
}

pub fn record_link_skipped(reason: &'static str) {
    ::metrics::counter!("push_links_skipped_total", "reason" => reason).increment(1);
}
