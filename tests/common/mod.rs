//! Shared fixtures for push pipeline tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::State,
    http::{header::LINK, HeaderValue, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use preload_push::push::{
    push_middleware, PushCapability, PushEngine, PushError, PushOptions, PushSink, Pusher,
};

/// Ordered log of pushes and next-stage invocations.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A pusher that records every accepted push and can be told to refuse
/// from the n-th attempt on.
#[derive(Debug, Default)]
pub struct RecordingPusher {
    journal: Journal,
    pushes: Mutex<Vec<(String, PushOptions)>>,
    attempts: AtomicUsize,
    fail_from: Option<usize>,
}

impl RecordingPusher {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn failing_from(journal: Journal, attempt: usize) -> Self {
        Self {
            fail_from: Some(attempt),
            ..Self::new(journal)
        }
    }

    pub fn pushes(&self) -> Vec<(String, PushOptions)> {
        self.pushes.lock().unwrap().clone()
    }

    pub fn targets(&self) -> Vec<String> {
        self.pushes().into_iter().map(|(target, _)| target).collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Pusher for RecordingPusher {
    fn push(&self, target: &str, options: PushOptions) -> Result<(), PushError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_from.is_some_and(|n| attempt >= n) {
            return Err(PushError::StreamLimit { limit: attempt - 1 });
        }
        self.journal.record(format!("push {target}"));
        self.pushes
            .lock()
            .unwrap()
            .push((target.to_string(), options));
        Ok(())
    }
}

/// A sink that keeps the targets of accepted promises.
#[derive(Debug, Default)]
pub struct RecordingSink(Mutex<Vec<String>>);

impl RecordingSink {
    pub fn targets(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl PushSink for RecordingSink {
    fn promise(&self, target: &str, _options: &PushOptions) -> Result<(), PushError> {
        self.0.lock().unwrap().push(target.to_string());
        Ok(())
    }
}

/// Stand-in for the rest of the pipeline: counts calls and answers with a
/// fixed status and `Link` headers.
#[derive(Debug, Clone)]
pub struct NextStage {
    pub journal: Journal,
    pub status: StatusCode,
    pub links: Vec<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl NextStage {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            status: StatusCode::OK,
            links: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_links(mut self, links: &[&'static str]) -> Self {
        self.links = links.to_vec();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The next stage on its own, without the push middleware.
    pub fn router(&self) -> Router {
        Router::new().fallback(next_stage).with_state(self.clone())
    }
}

async fn next_stage(State(stage): State<NextStage>) -> Response {
    stage.calls.fetch_add(1, Ordering::SeqCst);
    stage.journal.record("next");

    let mut response = (stage.status, "page body").into_response();
    for link in &stage.links {
        response
            .headers_mut()
            .append(LINK, HeaderValue::from_static(*link));
    }
    response
}

/// The push middleware in front of `stage`.
pub fn pipeline(engine: PushEngine, stage: &NextStage) -> Router {
    stage
        .router()
        .layer(middleware::from_fn_with_state(Arc::new(engine), push_middleware))
}

/// A GET request for `path` that can push through `pusher`.
pub fn push_request(path: &str, pusher: &Arc<RecordingPusher>) -> Request<Body> {
    let mut request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let pusher: Arc<dyn Pusher> = pusher.clone();
    request
        .extensions_mut()
        .insert(PushCapability::from_arc(pusher));
    request
}
