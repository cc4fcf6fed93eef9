//! Entities tracked by a node.

use rclbind_core::{
    EntityHandle, EntityKind, NodeHandle, Profile, RequestId, Result, TypeDescriptor,
};
use std::sync::Arc;

/// What a node knows about one of its publishers, subscriptions, clients or services.
///
/// Records compare by handle only.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub(crate) handle: EntityHandle,
    pub(crate) kind: EntityKind,
    pub(crate) node: NodeHandle,
    pub(crate) type_support: Arc<TypeDescriptor>,
    pub(crate) name: String,
    pub(crate) qos: Profile,
}

impl EntityRecord {
    /// Middleware handle of the entity.
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    /// Publisher, subscription, client or service.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Handle of the owning node.
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    /// Resolved type support.
    pub fn type_support(&self) -> &TypeDescriptor {
        &self.type_support
    }

    /// Topic or service name as given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// QoS profile given at creation.
    pub fn qos(&self) -> &Profile {
        &self.qos
    }
}

impl PartialEq for EntityRecord {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for EntityRecord {}

pub(crate) type MessageHandler = Box<dyn FnMut(&[u8]) -> Result<()> + Send>;
pub(crate) type RequestHandler = Box<dyn FnMut(&[u8]) -> Result<Vec<u8>> + Send>;
pub(crate) type ResponseHandler = Box<dyn FnMut(RequestId, &[u8]) -> Result<()> + Send>;

/// Callback plumbing invoked by spin for inbound data.
pub(crate) enum Handler {
    Outbound,
    Message(MessageHandler),
    Request(RequestHandler),
    Response(ResponseHandler),
}

pub(crate) struct Entity {
    pub(crate) record: EntityRecord,
    pub(crate) handler: Handler,
}
