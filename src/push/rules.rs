//! Push rules compiled from configuration.
//!
//! Rules are built once at startup and shared read-only by every request.

use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{HeaderMap, Method};
use thiserror::Error;

use crate::config::schema::{PushConfig, ResourceConfig, RuleConfig};
use crate::push::link::is_remote_resource;

/// Error raised when a configured rule cannot be turned into a runtime rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule path must start with '/', got {0:?}")]
    InvalidRulePath(String),

    #[error("resource path must be a same-origin absolute path, got {0:?}")]
    InvalidResourcePath(String),

    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    #[error("method {0} cannot be pushed (only GET and HEAD)")]
    UnsupportedMethod(Method),

    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),

    #[error("invalid value for header {0:?}")]
    InvalidHeaderValue(String),
}

/// A push target with the method and headers of its synthetic request.
#[derive(Debug, Clone)]
pub struct Resource {
    pub path: String,
    pub method: Method,
    pub headers: HeaderMap,
}

impl Resource {
    /// A GET push for `path` with no extra headers.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::GET,
            headers: HeaderMap::new(),
        }
    }
}

impl TryFrom<&ResourceConfig> for Resource {
    type Error = RuleError;

    fn try_from(config: &ResourceConfig) -> Result<Self, Self::Error> {
        if !config.path.starts_with('/') || is_remote_resource(&config.path) {
            return Err(RuleError::InvalidResourcePath(config.path.clone()));
        }

        let method = Method::from_bytes(config.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| RuleError::InvalidMethod(config.method.clone()))?;
        if method != Method::GET && method != Method::HEAD {
            return Err(RuleError::UnsupportedMethod(method));
        }

        let mut headers = HeaderMap::new();
        for (name, values) in &config.headers {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RuleError::InvalidHeaderName(name.clone()))?;
            for value in values.values() {
                let value = HeaderValue::from_str(value)
                    .map_err(|_| RuleError::InvalidHeaderValue(name.clone()))?;
                headers.append(header.clone(), value);
            }
        }

        Ok(Self {
            path: config.path.clone(),
            method,
            headers,
        })
    }
}

/// A request-path pattern and the resources it pushes, in order.
#[derive(Debug, Clone)]
pub struct Rule {
    pub path: String,
    pub resources: Vec<Resource>,
}

impl Rule {
    pub fn new(path: impl Into<String>, resources: Vec<Resource>) -> Self {
        Self {
            path: path.into(),
            resources,
        }
    }
}

impl TryFrom<&RuleConfig> for Rule {
    type Error = RuleError;

    fn try_from(config: &RuleConfig) -> Result<Self, Self::Error> {
        if !config.path.starts_with('/') {
            return Err(RuleError::InvalidRulePath(config.path.clone()));
        }
        let resources = config
            .resources
            .iter()
            .map(Resource::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(config.path.clone(), resources))
    }
}

/// Compile every configured rule, preserving configured order.
pub fn compile_rules(config: &PushConfig) -> Result<Vec<Rule>, RuleError> {
    config.rules.iter().map(Rule::try_from).collect()
}
