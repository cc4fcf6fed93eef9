//! Error types for rclbind operations.
//!
//! Two kinds of failure reach callers as [`Error`]:
//!
//! - configuration errors, such as a message type whose type support cannot
//!   be imported ([`Error::NoTypeSupportImported`]);
//! - misuse errors, such as publishing through an endpoint that has not been
//!   created yet or initializing a context twice.
//!
//! Destroying an entity that is not registered is not an error. Destroy
//! operations report it as `false`.

use crate::{handle::EntityKind, names::NameKind};
use thiserror::Error;

/// Dynamic error type that can be sent and shared between threads.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rclbind.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The type support of a message or service type could not be resolved.
    #[error("no type support imported for '{type_name}'")]
    NoTypeSupportImported {
        /// The type whose support failed to resolve.
        type_name: String,
    },

    /// Something that must only be initialized once was initialized again.
    #[error("already initialized: {0}")]
    AlreadyInitialized(String),

    /// An operation required an initialization step that did not happen.
    #[error("not initialized: {0}")]
    NotInitialized(String),

    /// A deferred endpoint was used before being backed by a real endpoint.
    #[error("endpoint not created: {0}")]
    EndpointNotCreated(String),

    /// A deferred endpoint was realized twice.
    #[error("already created: {0}")]
    AlreadyCreated(String),

    /// The node has been destroyed.
    #[error("node has been destroyed")]
    NodeDestroyed,

    /// The resource is in use by another operation, such as a running spin.
    #[error("busy: {0}")]
    Busy(String),

    /// Invalid node, namespace, topic or service name.
    #[error("invalid {kind} name '{name}': {reason}")]
    InvalidName {
        /// The kind of name that failed validation.
        kind: NameKind,
        /// The invalid name.
        name: String,
        /// The reason the name is invalid.
        reason: String,
    },

    /// A handle is not known to the middleware.
    #[error("invalid {0} handle")]
    InvalidHandle(EntityKind),

    /// Message serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The middleware reported a failure.
    #[error("middleware error: {0}")]
    Middleware(String),

    /// Operation timed out.
    #[error("timeout")]
    Timeout,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl Error {
    /// Returns true for errors caused by calling an operation before its
    /// precondition was established.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Error::AlreadyInitialized(_)
                | Error::NotInitialized(_)
                | Error::EndpointNotCreated(_)
                | Error::AlreadyCreated(_)
                | Error::NodeDestroyed
                | Error::Busy(_)
        )
    }
}
