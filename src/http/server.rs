//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compile push rules and build the push engine
//! - Create Axum Router with the static file stage and push middleware
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve plain (h2c / HTTP/1.1) or TLS listeners with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::recv_shutdown;
use crate::push::{
    advertise_push, compile_rules, push_middleware, PushEngine, PushSink, PushTransport,
    RuleError, TracingSink,
};
use crate::routing::{FsIndexResolver, PathMatcher};

/// Time in-flight TLS connections get to finish after shutdown is signalled.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for server construction and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid push rules: {0}")]
    Rules(#[from] RuleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server serving a static site with server push.
pub struct HttpServer {
    router: Router,
    engine: Arc<PushEngine>,
}

impl HttpServer {
    /// Create a server whose pushes are recorded by [`TracingSink`].
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        Self::with_push_sink(config, Arc::new(TracingSink))
    }

    /// Create a server handing accepted push promises to `sink`.
    pub fn with_push_sink(
        config: ServerConfig,
        sink: Arc<dyn PushSink>,
    ) -> Result<Self, ServerError> {
        let rules = compile_rules(&config.push)?;
        let engine = Arc::new(
            PushEngine::new(
                rules,
                Arc::new(FsIndexResolver::new(&config.site.root)),
                config.site.index_files.clone(),
            )
            .with_matcher(PathMatcher::new(config.site.case_sensitive_paths)),
        );
        let transport = PushTransport::from_config(&config.push, sink);

        let router = Self::build_router(&config, engine.clone(), transport);
        Ok(Self { router, engine })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Requests pass request ID, trace and timeout layers, then the push
    /// capability and push engine, then the static files as the next stage.
    #[allow(deprecated)]
    fn build_router(
        config: &ServerConfig,
        engine: Arc<PushEngine>,
        transport: PushTransport,
    ) -> Router {
        Router::new()
            .fallback_service(ServeDir::new(&config.site.root))
            .layer(middleware::from_fn_with_state(engine, push_middleware))
            .layer(middleware::from_fn_with_state(transport, advertise_push))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server on a plain TCP listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.engine.rules().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(recv_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        tracing::info!(
            address = %addr,
            rules = self.engine.rules().len(),
            "HTTPS server starting"
        );

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            recv_shutdown(shutdown).await;
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
