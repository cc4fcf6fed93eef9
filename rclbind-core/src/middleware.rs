//! The boundary between rclbind and a native middleware.
//!
//! Discovery, transport, serialization formats and QoS negotiation all live
//! behind this trait. rclbind only hands it handles, resolved type supports,
//! names and [`NativeQos`] records, and gets handles and byte buffers back.
//!
//! Implementations must be shareable between threads. rclbind itself calls
//! them from the thread owning the node.

use crate::{
    error::Result,
    handle::{EntityHandle, EntityKind, NodeHandle, RequestId},
    msg::TypeDescriptor,
    qos::NativeQos,
};
use std::time::Duration;

/// A native publish/subscribe middleware.
pub trait Middleware: Send + Sync {
    /// Name of the implementation, e.g. `rmw_fastrtps_cpp`.
    fn implementation_identifier(&self) -> &str;

    /// Initialize the middleware with the process arguments.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::AlreadyInitialized`](crate::Error::AlreadyInitialized)
    /// if called again before [`shutdown`](Self::shutdown).
    fn init(&self, args: &[String], domain_id: u32) -> Result<()>;

    /// True while the middleware is initialized and has not been told to stop.
    fn ok(&self) -> bool;

    /// Tell the middleware to stop. Blocked [`wait`](Self::wait) calls return.
    fn shutdown(&self) -> Result<()>;

    /// Create a node.
    fn create_node(&self, name: &str, namespace: &str) -> Result<NodeHandle>;

    /// Destroy a node.
    fn destroy_node(&self, node: NodeHandle) -> Result<()>;

    /// Create a publisher.
    fn create_publisher(
        &self,
        node: NodeHandle,
        type_support: &TypeDescriptor,
        topic_name: &str,
        qos: &NativeQos,
    ) -> Result<EntityHandle>;

    /// Create a subscription.
    fn create_subscription(
        &self,
        node: NodeHandle,
        type_support: &TypeDescriptor,
        topic_name: &str,
        qos: &NativeQos,
    ) -> Result<EntityHandle>;

    /// Create a service client.
    fn create_client(
        &self,
        node: NodeHandle,
        type_support: &TypeDescriptor,
        service_name: &str,
        qos: &NativeQos,
    ) -> Result<EntityHandle>;

    /// Create a service server.
    fn create_service(
        &self,
        node: NodeHandle,
        type_support: &TypeDescriptor,
        service_name: &str,
        qos: &NativeQos,
    ) -> Result<EntityHandle>;

    /// Destroy an entity of a node.
    fn destroy_node_entity(
        &self,
        kind: EntityKind,
        entity: EntityHandle,
        node: NodeHandle,
    ) -> Result<()>;

    /// Names and types of the topics currently known to the graph.
    fn topic_names_and_types(&self, node: NodeHandle) -> Result<Vec<(String, String)>>;

    /// Publish a serialized message.
    fn publish(&self, publisher: EntityHandle, payload: &[u8]) -> Result<()>;

    /// Send a serialized request, returning its sequence number.
    fn send_request(&self, client: EntityHandle, payload: &[u8]) -> Result<i64>;

    /// Send a serialized response to the request identified by `request_id`.
    fn send_response(
        &self,
        service: EntityHandle,
        request_id: RequestId,
        payload: &[u8],
    ) -> Result<()>;

    /// Block until at least one of `entities` has data, the timeout elapses
    /// or the middleware shuts down. `None` waits without timeout.
    ///
    /// Returns the ready entities, in the order they were given.
    fn wait(&self, entities: &[EntityHandle], timeout: Option<Duration>)
    -> Result<Vec<EntityHandle>>;

    /// Take one message from a subscription.
    fn take(&self, subscription: EntityHandle) -> Result<Option<Vec<u8>>>;

    /// Take one request from a service.
    fn take_request(&self, service: EntityHandle) -> Result<Option<(RequestId, Vec<u8>)>>;

    /// Take one response from a client.
    fn take_response(&self, client: EntityHandle) -> Result<Option<(RequestId, Vec<u8>)>>;
}
