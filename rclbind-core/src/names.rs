//! ROS2 name validation and expansion.
//!
//! # Rules
//!
//! - Names must not be empty
//! - Names may contain alphanumeric characters (`[0-9|a-z|A-Z]`), underscores
//!   (`_`) and, except for node names, forward slashes (`/`)
//! - Tokens must not start with a numeric character
//! - Names must not end with a forward slash (the root namespace `/` excepted)
//! - Names must not contain repeated forward slashes (`//`) or underscores (`__`)
//! - Topic and service names may start with `~`, which must be followed by `/`
//!
//! # Examples
//!
//! ```
//! use rclbind_core::names::{expand_topic_name, validate_node_name, validate_topic_name};
//!
//! assert!(validate_topic_name("/foo/bar").is_ok());
//! assert!(validate_topic_name("foo//bar").is_err());
//! assert!(validate_node_name("my/node").is_err());
//! assert_eq!(expand_topic_name("/ns", "talker", "~/out").unwrap(), "/ns/talker/out");
//! ```

use crate::error::{Error, Result};
use std::fmt;

/// What a name names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Node base name.
    Node,
    /// Node namespace.
    Namespace,
    /// Topic or service name.
    Topic,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Node => f.write_str("node"),
            NameKind::Namespace => f.write_str("namespace"),
            NameKind::Topic => f.write_str("topic"),
        }
    }
}

fn invalid(kind: NameKind, name: &str, reason: &str) -> Error {
    Error::InvalidName {
        kind,
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_tokens(kind: NameKind, original: &str, body: &str) -> Result<()> {
    if body.ends_with('/') {
        return Err(invalid(kind, original, "must not end with '/'"));
    }
    if body.contains("//") {
        return Err(invalid(kind, original, "must not contain '//'"));
    }
    if body.contains("__") {
        return Err(invalid(kind, original, "must not contain '__'"));
    }
    for token in body.split('/').filter(|t| !t.is_empty()) {
        if let Some(c) = token.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(invalid(
                kind,
                original,
                &format!("contains invalid character '{c}'"),
            ));
        }
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid(kind, original, "must not start with a number"));
        }
    }
    Ok(())
}

/// Validate a node base name.
pub fn validate_node_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(NameKind::Node, name, "must not be empty"));
    }
    if name.contains('/') || name.contains('~') {
        return Err(invalid(NameKind::Node, name, "must not contain '/' or '~'"));
    }
    validate_tokens(NameKind::Node, name, name)
}

/// Validate a node namespace. The empty namespace is treated as `/`.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() || namespace == "/" {
        return Ok(());
    }
    if namespace.contains('~') {
        return Err(invalid(NameKind::Namespace, namespace, "must not contain '~'"));
    }
    validate_tokens(NameKind::Namespace, namespace, namespace)
}

/// Validate a topic or service name.
pub fn validate_topic_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(NameKind::Topic, name, "must not be empty"));
    }
    let body = match name.strip_prefix('~') {
        Some("") => return Ok(()),
        Some(rest) if rest.starts_with('/') => rest,
        Some(_) => return Err(invalid(NameKind::Topic, name, "'~' must be followed by '/'")),
        None => name,
    };
    if body.contains('~') {
        return Err(invalid(NameKind::Topic, name, "'~' is only allowed first"));
    }
    validate_tokens(NameKind::Topic, name, body)
}

/// Build the fully qualified name of a node.
pub fn build_node_fqn(namespace: &str, node_name: &str) -> String {
    let namespace = namespace.trim_end_matches('/');
    if namespace.is_empty() {
        format!("/{node_name}")
    } else if namespace.starts_with('/') {
        format!("{namespace}/{node_name}")
    } else {
        format!("/{namespace}/{node_name}")
    }
}

/// Expand a topic or service name to its fully qualified form.
///
/// Absolute names are returned as is, `~` is replaced by the node's fully
/// qualified name and relative names are prefixed with the namespace.
pub fn expand_topic_name(namespace: &str, node_name: &str, name: &str) -> Result<String> {
    validate_topic_name(name)?;
    if name.starts_with('/') {
        return Ok(name.to_string());
    }
    if let Some(rest) = name.strip_prefix('~') {
        return Ok(format!("{}{}", build_node_fqn(namespace, node_name), rest));
    }
    let namespace = namespace.trim_end_matches('/');
    if namespace.is_empty() {
        Ok(format!("/{name}"))
    } else if namespace.starts_with('/') {
        Ok(format!("{namespace}/{name}"))
    } else {
        Ok(format!("/{namespace}/{name}"))
    }
}
