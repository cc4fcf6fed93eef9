//! Opaque handles to middleware resources.
//!
//! Handles are plain identifiers handed out by a [`Middleware`](crate::Middleware).
//! Two endpoint values refer to the same entity exactly when their handles
//! are equal, whatever object holds them.

use std::fmt;

/// Handle of a node inside the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(pub u64);

/// Handle of a publisher, subscription, client or service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityHandle(pub u64);

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// The kind of a node entity, passed to the middleware on destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Topic publisher.
    Publisher,
    /// Topic subscription.
    Subscription,
    /// Service client.
    Client,
    /// Service server.
    Service,
}

impl EntityKind {
    /// The tag the native layer uses for this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Publisher => "publisher",
            EntityKind::Subscription => "subscription",
            EntityKind::Client => "client",
            EntityKind::Service => "service",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one request of a service client.
///
/// `writer` is the client entity that sent the request and `sequence` is the
/// per-client sequence number assigned by the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId {
    /// Client that issued the request.
    pub writer: EntityHandle,
    /// Sequence number of the request.
    pub sequence: i64,
}
