//! Service server.

use crate::entity::{EntityRecord, RequestHandler};
use rclbind_core::{EntityHandle, Profile, ServiceMsg, TypeSupport};
use std::marker::PhantomData;

/// Service server, created by [`Node::create_service`](crate::Node::create_service).
///
/// Requests are answered by the callback given at creation while the owning
/// node spins.
pub struct Service<T> {
    record: EntityRecord,
    _phantom: PhantomData<fn(T)>,
}

impl<T: ServiceMsg> Service<T> {
    pub(crate) fn new(record: EntityRecord) -> Self {
        Service {
            record,
            _phantom: PhantomData,
        }
    }

    pub(crate) fn handler<F>(mut callback: F) -> RequestHandler
    where
        F: FnMut(T::Request) -> T::Response + Send + 'static,
    {
        Box::new(move |bytes| {
            let request = T::Request::from_bytes(bytes)?;
            callback(request).to_bytes()
        })
    }

    /// Middleware handle of this service.
    pub fn handle(&self) -> EntityHandle {
        self.record.handle
    }

    /// Get the service name.
    pub fn service_name(&self) -> &str {
        &self.record.name
    }

    /// QoS profile the service was created with.
    pub fn qos(&self) -> &Profile {
        &self.record.qos
    }
}
