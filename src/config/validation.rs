//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate push rules and resources (paths, methods, headers)
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ServerConfig;
use crate::push::rules::{Resource, RuleError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `push.rules[0].path`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {:?}", config.listener.bind_address),
        ));
    }

    if config.site.index_files.is_empty() {
        errors.push(ValidationError::new("site.index_files", "must not be empty"));
    }
    for (i, name) in config.site.index_files.iter().enumerate() {
        if name.is_empty() || name.contains('/') {
            errors.push(ValidationError::new(
                format!("site.index_files[{i}]"),
                format!("not a plain file name: {name:?}"),
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.push.enabled && config.push.max_pushes_per_request == 0 {
        errors.push(ValidationError::new(
            "push.max_pushes_per_request",
            "must be greater than 0 when push is enabled",
        ));
    }

    for (i, rule) in config.push.rules.iter().enumerate() {
        if !rule.path.starts_with('/') {
            errors.push(ValidationError::new(
                format!("push.rules[{i}].path"),
                format!("must start with '/', got {:?}", rule.path),
            ));
        }
        for (j, resource) in rule.resources.iter().enumerate() {
            if let Err(err) = Resource::try_from(resource) {
                let field = match err {
                    RuleError::InvalidMethod(_) | RuleError::UnsupportedMethod(_) => "method",
                    RuleError::InvalidHeaderName(_) | RuleError::InvalidHeaderValue(_) => {
                        "headers"
                    }
                    RuleError::InvalidRulePath(_) | RuleError::InvalidResourcePath(_) => "path",
                };
                errors.push(ValidationError::new(
                    format!("push.rules[{i}].resources[{j}].{field}"),
                    err.to_string(),
                ));
            }
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "not a socket address: {:?}",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
