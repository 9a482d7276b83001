//! Built-in push transport.
//!
//! # Responsibilities
//! - Attach a push capability to HTTP/2 requests
//! - Enforce the per-request push stream budget
//! - Hand accepted promises to a sink
//!
//! # Design Decisions
//! - Frame encoding belongs to the connection stack; sinks only receive
//!   accepted promises
//! - A fresh budget is created for every request

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, Version},
    middleware::Next,
    response::Response,
};

use crate::config::schema::PushConfig;
use crate::push::pusher::{PushCapability, PushError, PushOptions, Pusher};

/// Receives push promises accepted by a [`BudgetedPusher`].
pub trait PushSink: Send + Sync + Debug {
    fn promise(&self, target: &str, options: &PushOptions) -> Result<(), PushError>;
}

/// Records each accepted promise as a structured log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl PushSink for TracingSink {
    fn promise(&self, target: &str, options: &PushOptions) -> Result<(), PushError> {
        tracing::info!(
            target_path = %target,
            method = %options.method,
            headers = options.headers.len(),
            "Push promise issued"
        );
        Ok(())
    }
}

/// A pusher with a fixed stream budget for one request.
#[derive(Debug)]
pub struct BudgetedPusher {
    sink: Arc<dyn PushSink>,
    limit: usize,
    issued: AtomicUsize,
}

impl BudgetedPusher {
    pub fn new(sink: Arc<dyn PushSink>, limit: usize) -> Self {
        Self {
            sink,
            limit,
            issued: AtomicUsize::new(0),
        }
    }

    fn reserve(&self) -> Result<(), PushError> {
        self.issued
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.limit).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|_| PushError::StreamLimit { limit: self.limit })
    }
}

impl Pusher for BudgetedPusher {
    fn push(&self, target: &str, options: PushOptions) -> Result<(), PushError> {
        // Promised requests must be safe and cacheable.
        if options.method != Method::GET && options.method != Method::HEAD {
            return Err(PushError::NotSupported);
        }
        self.reserve()?;
        self.sink.promise(target, &options)
    }
}

/// Shared transport state used to mint per-request pushers.
#[derive(Debug, Clone)]
pub struct PushTransport {
    sink: Arc<dyn PushSink>,
    max_pushes: usize,
    enabled: bool,
}

impl PushTransport {
    pub fn new(sink: Arc<dyn PushSink>, max_pushes: usize) -> Self {
        Self {
            sink,
            max_pushes,
            enabled: true,
        }
    }

    pub fn from_config(config: &PushConfig, sink: Arc<dyn PushSink>) -> Self {
        Self {
            enabled: config.enabled,
            ..Self::new(sink, config.max_pushes_per_request)
        }
    }

    /// A fresh pusher for one request, or `None` when pushing is off.
    pub fn pusher_for(&self, version: Version) -> Option<BudgetedPusher> {
        (self.enabled && version == Version::HTTP_2)
            .then(|| BudgetedPusher::new(self.sink.clone(), self.max_pushes))
    }
}

/// Middleware that advertises the push capability on HTTP/2 requests.
pub async fn advertise_push(
    State(transport): State<PushTransport>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(pusher) = transport.pusher_for(request.version()) {
        request
            .extensions_mut()
            .insert(PushCapability::new(pusher));
    }
    next.run(request).await
}
