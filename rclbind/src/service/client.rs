//! Service client.
//!
//! A request is sent with [`Client::send_request`]; its response is taken
//! while the owning node spins and parked until [`Client::take_response`]
//! claims it.
//!
//! # Example
//!
//! ```ignore
//! let client = node.create_client::<AddTwoInts>("add_two_ints", None)?;
//! let id = client.send_request(&AddTwoIntsRequest { a: 1, b: 2 })?;
//! let response = rclbind::spin_until_response(&mut node, &client, id, None)?;
//! ```

use crate::entity::{EntityRecord, ResponseHandler};
use parking_lot::Mutex;
use rclbind_core::{
    EntityHandle, Middleware, Profile, RequestId, Result, ServiceMsg, TypeSupport,
};
use std::{collections::BTreeMap, sync::Arc};

type Responses<T> = Arc<Mutex<BTreeMap<i64, <T as ServiceMsg>::Response>>>;

/// Service client, created by [`Node::create_client`](crate::Node::create_client).
pub struct Client<T: ServiceMsg> {
    record: EntityRecord,
    middleware: Arc<dyn Middleware>,
    responses: Responses<T>,
}

impl<T: ServiceMsg> Client<T> {
    pub(crate) fn new(
        record: EntityRecord,
        middleware: Arc<dyn Middleware>,
        responses: Responses<T>,
    ) -> Self {
        Client {
            record,
            middleware,
            responses,
        }
    }

    pub(crate) fn response_slot() -> Responses<T> {
        Arc::new(Mutex::new(BTreeMap::new()))
    }

    pub(crate) fn handler(responses: Responses<T>) -> ResponseHandler {
        Box::new(move |request_id, bytes| {
            let response = T::Response::from_bytes(bytes)?;
            responses.lock().insert(request_id.sequence, response);
            Ok(())
        })
    }

    /// Middleware handle of this client.
    pub fn handle(&self) -> EntityHandle {
        self.record.handle
    }

    /// Get the service name.
    pub fn service_name(&self) -> &str {
        &self.record.name
    }

    /// QoS profile the client was created with.
    pub fn qos(&self) -> &Profile {
        &self.record.qos
    }

    /// Send a request.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the middleware rejects the client.
    pub fn send_request(&self, request: &T::Request) -> Result<RequestId> {
        let payload = request.to_bytes()?;
        let sequence = self.middleware.send_request(self.record.handle, &payload)?;
        Ok(RequestId {
            writer: self.record.handle,
            sequence,
        })
    }

    /// Take the response to `request_id` if it has arrived.
    pub fn take_response(&self, request_id: RequestId) -> Option<T::Response> {
        if request_id.writer != self.record.handle {
            return None;
        }
        self.responses.lock().remove(&request_id.sequence)
    }

    /// Number of responses received but not taken yet.
    pub fn pending_responses(&self) -> usize {
        self.responses.lock().len()
    }
}
