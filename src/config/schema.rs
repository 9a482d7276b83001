//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the push server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Document root and index file settings.
    pub site: SiteConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Server push rules and transport limits.
    pub push: PushConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8443").
    pub bind_address: String,

    /// Optional TLS configuration. Browsers only speak HTTP/2 over TLS.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8443".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Static site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory served to clients and used for index file resolution.
    pub root: PathBuf,

    /// File names tried, in order, when a request targets a directory.
    pub index_files: Vec<String>,

    /// Whether rule patterns compare paths case-sensitively.
    pub case_sensitive_paths: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./public"),
            index_files: default_index_files(),
            case_sensitive_paths: true,
        }
    }
}

/// Index file names recognised when none are configured.
pub fn default_index_files() -> Vec<String> {
    [
        "index.html",
        "index.htm",
        "index.txt",
        "default.html",
        "default.htm",
        "default.txt",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Server push configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PushConfig {
    /// Advertise the push capability on HTTP/2 requests.
    pub enabled: bool,

    /// Number of pushes the built-in transport accepts per request
    /// before reporting the stream budget as exhausted.
    pub max_pushes_per_request: usize,

    /// Push rules, evaluated in order.
    pub rules: Vec<RuleConfig>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_pushes_per_request: 100,
            rules: Vec::new(),
        }
    }
}

/// A request path pattern and the resources pushed when it matches.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Path prefix matched against the request path.
    pub path: String,

    /// Resources pushed, in order, when the rule matches.
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

/// A single push target.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceConfig {
    /// Same-origin path of the pushed resource.
    pub path: String,

    /// Method of the synthetic pushed request (GET or HEAD).
    #[serde(default = "default_method")]
    pub method: String,

    /// Extra headers attached to the pushed request.
    #[serde(default)]
    pub headers: BTreeMap<String, HeaderValues>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// One header value or a list of them.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HeaderValues {
    One(String),
    Many(Vec<String>),
}

impl HeaderValues {
    /// Values in configured order.
    pub fn values(&self) -> &[String] {
        match self {
            HeaderValues::One(value) => std::slice::from_ref(value),
            HeaderValues::Many(values) => values,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
