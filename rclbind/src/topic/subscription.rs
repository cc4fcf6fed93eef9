//! Topic subscription.
//!
//! Messages are delivered to the callback given at creation while the owning
//! node spins; see [`spin`](crate::spin).

use crate::entity::{EntityRecord, MessageHandler};
use rclbind_core::{EntityHandle, Profile, TypeSupport};
use std::marker::PhantomData;

/// Topic subscription, created by [`Node::create_subscription`](crate::Node::create_subscription).
pub struct Subscription<T> {
    record: EntityRecord,
    _phantom: PhantomData<fn(T)>,
}

impl<T: TypeSupport> Subscription<T> {
    pub(crate) fn new(record: EntityRecord) -> Self {
        Subscription {
            record,
            _phantom: PhantomData,
        }
    }

    pub(crate) fn handler<F>(mut callback: F) -> MessageHandler
    where
        F: FnMut(T) + Send + 'static,
    {
        Box::new(move |bytes| {
            let msg = T::from_bytes(bytes)?;
            callback(msg);
            Ok(())
        })
    }

    /// Middleware handle of this subscription.
    pub fn handle(&self) -> EntityHandle {
        self.record.handle
    }

    /// Get the topic name.
    pub fn topic_name(&self) -> &str {
        &self.record.name
    }

    /// QoS profile the subscription was created with.
    pub fn qos(&self) -> &Profile {
        &self.record.qos
    }
}
