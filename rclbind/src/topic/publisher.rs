//! Topic publisher.
//!
//! # Example
//!
//! ```ignore
//! let publisher = node.create_publisher::<std_msgs::msg::String>("chatter", None)?;
//!
//! let msg = std_msgs::msg::String { data: "Hello!".into() };
//! publisher.publish(&msg)?;
//! ```

use crate::entity::EntityRecord;
use rclbind_core::{EntityHandle, Middleware, Profile, Result, TypeSupport};
use std::{marker::PhantomData, sync::Arc};

/// Topic publisher, created by [`Node::create_publisher`](crate::Node::create_publisher).
pub struct Publisher<T> {
    record: EntityRecord,
    middleware: Arc<dyn Middleware>,
    _phantom: PhantomData<fn(&T)>,
}

impl<T: TypeSupport> Publisher<T> {
    pub(crate) fn new(record: EntityRecord, middleware: Arc<dyn Middleware>) -> Self {
        Publisher {
            record,
            middleware,
            _phantom: PhantomData,
        }
    }

    /// Middleware handle of this publisher.
    pub fn handle(&self) -> EntityHandle {
        self.record.handle
    }

    /// Get the topic name.
    pub fn topic_name(&self) -> &str {
        &self.record.name
    }

    /// QoS profile the publisher was created with.
    pub fn qos(&self) -> &Profile {
        &self.record.qos
    }

    /// Publish a message.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the middleware rejects the
    /// publisher, for instance because it or its node was destroyed.
    pub fn publish(&self, msg: &T) -> Result<()> {
        let payload = msg.to_bytes()?;
        self.middleware.publish(self.record.handle, &payload)
    }
}
