//! Push decision engine.
//!
//! Runs as a middleware stage. For each request it
//! 1. pushes the resources of every matching rule,
//! 2. lets the next stage produce the response,
//! 3. pushes same-origin targets advertised in the response's `Link` headers.
//!
//! Push is an optimisation: a failed push ends the current phase and is
//! otherwise invisible. The response is always the next stage's, unchanged.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::LINK, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use percent_encoding::percent_decode_str;

use crate::observability::metrics::{self, PushPhase};
use crate::push::headers::{merge_headers, proxied_headers, PUSH_MARKER};
use crate::push::link::parse_link_header;
use crate::push::pusher::{PushCapability, PushError, PushOptions, Pusher};
use crate::push::rules::Rule;
use crate::routing::index::IndexResolver;
use crate::routing::matcher::PathMatcher;

/// Decides what to push for a request. Immutable once built.
#[derive(Debug)]
pub struct PushEngine {
    rules: Arc<[Rule]>,
    matcher: PathMatcher,
    index: Arc<dyn IndexResolver>,
    index_files: Arc<[String]>,
}

impl PushEngine {
    pub fn new(
        rules: Vec<Rule>,
        index: Arc<dyn IndexResolver>,
        index_files: Vec<String>,
    ) -> Self {
        Self {
            rules: rules.into(),
            matcher: PathMatcher::default(),
            index,
            index_files: index_files.into(),
        }
    }

    pub fn with_matcher(mut self, matcher: PathMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// A rule matches the literal path, or the index file a directory
    /// request resolves to.
    pub fn rule_matches(&self, rule: &Rule, path: &str, index: Option<&str>) -> bool {
        self.matcher.matches(path, &rule.path)
            || index.is_some_and(|index| self.matcher.matches(index, &rule.path))
    }

    /// Resolve the index file for a directory request, once, off the async
    /// worker. Skipped when every rule already matches the literal path.
    pub async fn resolve_index(&self, path: &str) -> Option<String> {
        if !(path.is_empty() || path.ends_with('/')) {
            return None;
        }
        if self
            .rules
            .iter()
            .all(|rule| self.matcher.matches(path, &rule.path))
        {
            return None;
        }

        let resolver = self.index.clone();
        let index_files = self.index_files.clone();
        let path = path.to_owned();
        match tokio::task::spawn_blocking(move || resolver.index_file(&path, &index_files)).await {
            Ok(index) => index,
            Err(err) => {
                tracing::warn!(error = %err, "Index file lookup failed");
                None
            }
        }
    }

    /// Run the push phases around `next`.
    pub async fn serve(&self, request: Request, next: Next) -> Response {
        let Some(capability) = request.extensions().get::<PushCapability>().cloned() else {
            return next.run(request).await;
        };

        // Our own pushed requests come back through the pipeline.
        if request.headers().contains_key(PUSH_MARKER) {
            return next.run(request).await;
        }

        let proxied = proxied_headers(request.headers(), request.uri());
        let pusher = capability.pusher();

        let path = decoded_path(request.uri());
        let index = self.resolve_index(&path).await;
        if self
            .push_rules(pusher, &path, index.as_deref(), &proxied)
            .is_err()
        {
            metrics::record_phase_aborted(PushPhase::Rules);
        }

        let response = next.run(request).await;

        if self
            .push_links(pusher, &proxied, response.headers())
            .is_err()
        {
            metrics::record_phase_aborted(PushPhase::Links);
        }

        response
    }

    /// Push the resources of every matching rule. The first failure stops
    /// the whole phase, including later rules.
    pub fn push_rules(
        &self,
        pusher: &dyn Pusher,
        path: &str,
        index: Option<&str>,
        proxied: &HeaderMap,
    ) -> Result<(), PushError> {
        for rule in self
            .rules
            .iter()
            .filter(|rule| self.rule_matches(rule, path, index))
        {
            for resource in &rule.resources {
                let options = PushOptions::new(
                    resource.method.clone(),
                    merge_headers(proxied, &resource.headers),
                );
                push_one(pusher, PushPhase::Rules, &resource.path, options)?;
            }
        }
        Ok(())
    }

    /// Push same-origin targets named by `Link` headers. The first failure
    /// stops the phase across all remaining header values.
    pub fn push_links(
        &self,
        pusher: &dyn Pusher,
        proxied: &HeaderMap,
        response_headers: &HeaderMap,
    ) -> Result<(), PushError> {
        for value in response_headers.get_all(LINK) {
            let Ok(value) = value.to_str() else {
                metrics::record_link_skipped("malformed");
                continue;
            };
            for entry in parse_link_header(value) {
                if entry.is_nopush() {
                    metrics::record_link_skipped("nopush");
                    continue;
                }
                if entry.is_remote() {
                    tracing::debug!(target_url = entry.target(), "Skipping remote preload link");
                    metrics::record_link_skipped("remote");
                    continue;
                }
                push_one(
                    pusher,
                    PushPhase::Links,
                    entry.target(),
                    PushOptions::get(proxied.clone()),
                )?;
            }
        }
        Ok(())
    }
}

/// The request path with percent-escapes decoded, as the static file stage
/// sees it.
fn decoded_path(uri: &Uri) -> String {
    percent_decode_str(uri.path())
        .decode_utf8_lossy()
        .into_owned()
}

fn push_one(
    pusher: &dyn Pusher,
    phase: PushPhase,
    target: &str,
    options: PushOptions,
) -> Result<(), PushError> {
    let method = options.method.clone();
    let result = pusher.push(target, options);
    metrics::record_push(phase, result.is_ok());
    if result.is_ok() {
        tracing::debug!(phase = phase.as_str(), target_path = target, %method, "Pushed resource");
    }
    result
}

/// Middleware entry point: `from_fn_with_state(engine, push_middleware)`.
pub async fn push_middleware(
    State(engine): State<Arc<PushEngine>>,
    request: Request,
    next: Next,
) -> Response {
    engine.serve(request, next).await
}
