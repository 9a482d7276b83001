//! The push capability exposed by the connection layer.

use std::fmt;
use std::sync::Arc;

use axum::http::{HeaderMap, Method};
use thiserror::Error;

/// Why a push attempt was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PushError {
    /// The connection cannot push (disabled by the peer, or not HTTP/2).
    #[error("server push not supported")]
    NotSupported,

    /// The concurrent stream budget for this request is used up.
    #[error("push stream budget of {limit} exhausted")]
    StreamLimit { limit: usize },

    #[error("push transport error: {0}")]
    Transport(String),
}

/// Method and headers of a synthetic pushed request.
#[derive(Debug, Clone, PartialEq)]
pub struct PushOptions {
    pub method: Method,
    pub headers: HeaderMap,
}

impl PushOptions {
    pub fn new(method: Method, headers: HeaderMap) -> Self {
        Self { method, headers }
    }

    pub fn get(headers: HeaderMap) -> Self {
        Self::new(Method::GET, headers)
    }
}

/// Issues push promises on the connection serving the current request.
///
/// `push` returns once the transport has accepted or refused the promise.
pub trait Pusher: Send + Sync {
    fn push(&self, target: &str, options: PushOptions) -> Result<(), PushError>;
}

impl<P: Pusher + ?Sized> Pusher for Arc<P> {
    fn push(&self, target: &str, options: PushOptions) -> Result<(), PushError> {
        (**self).push(target, options)
    }
}

/// Request extension advertising that the response can push.
///
/// Connections that cannot push simply do not insert it.
#[derive(Clone)]
pub struct PushCapability(Arc<dyn Pusher>);

impl PushCapability {
    pub fn new(pusher: impl Pusher + 'static) -> Self {
        Self(Arc::new(pusher))
    }

    pub fn from_arc(pusher: Arc<dyn Pusher>) -> Self {
        Self(pusher)
    }

    pub fn pusher(&self) -> &dyn Pusher {
        self.0.as_ref()
    }
}

impl fmt::Debug for PushCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PushCapability")
    }
}
