//! Node of ROS2.
//! Nodes can be created by `Context::create_node`.
//!
//! A node owns every publisher, subscription, client and service created
//! through it. Each entity is created against the node's middleware handle,
//! recorded in insertion order, and destroyed either explicitly or when the
//! node is destroyed. Dropping a node that was not destroyed destroys it.
//!
//! # Example
//!
//! ```
//! use rclbind::{Context, InitOptions, LoopbackMiddleware};
//! use std::sync::Arc;
//!
//! let ctx = Context::with_options(
//!     Arc::new(LoopbackMiddleware::new()),
//!     InitOptions::default().handle_signals(false),
//! )
//! .unwrap();
//!
//! let mut node = ctx.create_node("node_rs", Some("/robot")).unwrap();
//! assert_eq!(node.fully_qualified_name(), "/robot/node_rs");
//!
//! node.destroy_node();
//! assert!(!node.is_valid());
//! ```

use crate::{
    context::Context,
    entity::{Entity, EntityRecord, Handler},
    service::{client::Client, server::Service},
    topic::{publisher::Publisher, subscription::Subscription},
};
use rclbind_core::{
    EntityHandle, EntityKind, Error, NodeHandle, Profile, Result, ServiceMsg, TypeDescriptor,
    TypeSupport, names,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Order in which `destroy_node` tears entities down, inbound first.
const TEARDOWN_ORDER: [EntityKind; 4] = [
    EntityKind::Subscription,
    EntityKind::Publisher,
    EntityKind::Client,
    EntityKind::Service,
];

/// Node of ROS2.
pub struct Node {
    handle: Option<NodeHandle>,
    name: String,
    namespace: String,
    pub(crate) publishers: Vec<Entity>,
    pub(crate) subscriptions: Vec<Entity>,
    pub(crate) clients: Vec<Entity>,
    pub(crate) services: Vec<Entity>,
    context: Arc<Context>,
}

impl Node {
    pub(crate) fn new(context: Arc<Context>, name: &str, namespace: &str) -> Result<Self> {
        names::validate_node_name(name)?;
        names::validate_namespace(namespace)?;

        let handle = context.middleware().create_node(name, namespace)?;
        debug!(name, namespace, %handle, "created node");

        Ok(Node {
            handle: Some(handle),
            name: name.to_string(),
            namespace: namespace.to_string(),
            publishers: Vec::new(),
            subscriptions: Vec::new(),
            clients: Vec::new(),
            services: Vec::new(),
            context,
        })
    }

    /// Middleware handle, `None` once the node is destroyed.
    pub fn handle(&self) -> Option<NodeHandle> {
        self.handle
    }

    /// True until [`destroy_node`](Self::destroy_node) runs.
    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    /// Get the node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the node namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the fully qualified node name.
    pub fn fully_qualified_name(&self) -> String {
        names::build_node_fqn(&self.namespace, &self.name)
    }

    /// Get the parent context.
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Publishers of this node, in creation order.
    pub fn publishers(&self) -> impl ExactSizeIterator<Item = &EntityRecord> + '_ {
        self.publishers.iter().map(|e| &e.record)
    }

    /// Subscriptions of this node, in creation order.
    pub fn subscriptions(&self) -> impl ExactSizeIterator<Item = &EntityRecord> + '_ {
        self.subscriptions.iter().map(|e| &e.record)
    }

    /// Clients of this node, in creation order.
    pub fn clients(&self) -> impl ExactSizeIterator<Item = &EntityRecord> + '_ {
        self.clients.iter().map(|e| &e.record)
    }

    /// Services of this node, in creation order.
    pub fn services(&self) -> impl ExactSizeIterator<Item = &EntityRecord> + '_ {
        self.services.iter().map(|e| &e.record)
    }

    fn entities_mut(&mut self, kind: EntityKind) -> &mut Vec<Entity> {
        match kind {
            EntityKind::Publisher => &mut self.publishers,
            EntityKind::Subscription => &mut self.subscriptions,
            EntityKind::Client => &mut self.clients,
            EntityKind::Service => &mut self.services,
        }
    }

    /// Create a publisher.
    /// If `qos` is `None`, the default profile is used.
    ///
    /// `T` is the type of messages the created publisher sends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTypeSupportImported`] if the type support of `T`
    /// cannot be resolved. No middleware resource is allocated in that case.
    pub fn create_publisher<T: TypeSupport>(
        &mut self,
        topic_name: &str,
        qos: Option<Profile>,
    ) -> Result<Publisher<T>> {
        let type_support = self.context.type_support().resolve::<T>()?;
        let record = self.create_entity(
            EntityKind::Publisher,
            type_support,
            topic_name,
            qos.unwrap_or_default(),
            Handler::Outbound,
        )?;
        Ok(Publisher::new(record, self.context.middleware().clone()))
    }

    /// Create a subscription invoking `callback` for every message taken
    /// while spinning.
    /// If `qos` is `None`, the default profile is used.
    pub fn create_subscription<T, F>(
        &mut self,
        topic_name: &str,
        callback: F,
        qos: Option<Profile>,
    ) -> Result<Subscription<T>>
    where
        T: TypeSupport,
        F: FnMut(T) + Send + 'static,
    {
        let type_support = self.context.type_support().resolve::<T>()?;
        let record = self.create_entity(
            EntityKind::Subscription,
            type_support,
            topic_name,
            qos.unwrap_or_default(),
            Handler::Message(Subscription::<T>::handler(callback)),
        )?;
        Ok(Subscription::new(record))
    }

    /// Create a client.
    /// If `qos` is `None`, the services default profile is used.
    pub fn create_client<T: ServiceMsg>(
        &mut self,
        service_name: &str,
        qos: Option<Profile>,
    ) -> Result<Client<T>> {
        let type_support = self.context.type_support().resolve_service::<T>()?;
        let responses = Client::<T>::response_slot();
        let record = self.create_entity(
            EntityKind::Client,
            type_support,
            service_name,
            qos.unwrap_or_else(Profile::services_default),
            Handler::Response(Client::<T>::handler(responses.clone())),
        )?;
        Ok(Client::new(
            record,
            self.context.middleware().clone(),
            responses,
        ))
    }

    /// Create a service answering each request with `callback`.
    /// If `qos` is `None`, the services default profile is used.
    pub fn create_service<T, F>(
        &mut self,
        service_name: &str,
        callback: F,
        qos: Option<Profile>,
    ) -> Result<Service<T>>
    where
        T: ServiceMsg,
        F: FnMut(T::Request) -> T::Response + Send + 'static,
    {
        let type_support = self.context.type_support().resolve_service::<T>()?;
        let record = self.create_entity(
            EntityKind::Service,
            type_support,
            service_name,
            qos.unwrap_or_else(Profile::services_default),
            Handler::Request(Service::<T>::handler(callback)),
        )?;
        Ok(Service::new(record))
    }

    fn create_entity(
        &mut self,
        kind: EntityKind,
        type_support: Arc<TypeDescriptor>,
        name: &str,
        qos: Profile,
        handler: Handler,
    ) -> Result<EntityRecord> {
        let node = self.handle.ok_or(Error::NodeDestroyed)?;
        names::validate_topic_name(name)?;

        let native = qos.to_native();
        let middleware = self.context.middleware();
        let handle = match kind {
            EntityKind::Publisher => {
                middleware.create_publisher(node, &type_support, name, &native)?
            }
            EntityKind::Subscription => {
                middleware.create_subscription(node, &type_support, name, &native)?
            }
            EntityKind::Client => middleware.create_client(node, &type_support, name, &native)?,
            EntityKind::Service => middleware.create_service(node, &type_support, name, &native)?,
        };
        debug!(%kind, name, type_name = type_support.name(), %handle, "created entity");

        let record = EntityRecord {
            handle,
            kind,
            node,
            type_support,
            name: name.to_string(),
            qos,
        };
        self.entities_mut(kind).push(Entity {
            record: record.clone(),
            handler,
        });
        Ok(record)
    }

    /// Destroy a publisher.
    ///
    /// Returns `false` if the publisher is not one of this node's, for
    /// instance because it was already destroyed.
    pub fn destroy_publisher<T: TypeSupport>(&mut self, publisher: &Publisher<T>) -> bool {
        self.destroy_entity(EntityKind::Publisher, publisher.handle())
    }

    /// Destroy a subscription. Returns `false` if it is not registered.
    pub fn destroy_subscription<T: TypeSupport>(&mut self, subscription: &Subscription<T>) -> bool {
        self.destroy_entity(EntityKind::Subscription, subscription.handle())
    }

    /// Destroy a client. Returns `false` if it is not registered.
    pub fn destroy_client<T: ServiceMsg>(&mut self, client: &Client<T>) -> bool {
        self.destroy_entity(EntityKind::Client, client.handle())
    }

    /// Destroy a service. Returns `false` if it is not registered.
    pub fn destroy_service<T: ServiceMsg>(&mut self, service: &Service<T>) -> bool {
        self.destroy_entity(EntityKind::Service, service.handle())
    }

    /// Destroy the first entity of `kind` whose handle is `handle`.
    ///
    /// A middleware failure is logged; the entity is unregistered either way.
    pub fn destroy_entity(&mut self, kind: EntityKind, handle: EntityHandle) -> bool {
        let Some(node) = self.handle else {
            return false;
        };
        let Some(index) = self
            .entities_mut(kind)
            .iter()
            .position(|e| e.record.handle == handle)
        else {
            return false;
        };

        if let Err(e) = self
            .context
            .middleware()
            .destroy_node_entity(kind, handle, node)
        {
            warn!(%kind, %handle, "failed to destroy entity: {e}");
        }
        self.entities_mut(kind).remove(index);
        debug!(%kind, %handle, "destroyed entity");
        true
    }

    /// Destroy every entity, then the node itself.
    ///
    /// Teardown is best effort: a failing entity is logged and the remaining
    /// ones are still destroyed. Calling this again is a no-op.
    pub fn destroy_node(&mut self) {
        let Some(node) = self.handle.take() else {
            return;
        };
        let middleware = self.context.middleware().clone();

        for kind in TEARDOWN_ORDER {
            for entity in self.entities_mut(kind).drain(..) {
                let handle = entity.record.handle;
                if let Err(e) = middleware.destroy_node_entity(kind, handle, node) {
                    warn!(%kind, %handle, "failed to destroy entity: {e}");
                }
            }
        }

        if let Err(e) = middleware.destroy_node(node) {
            warn!(%node, "failed to destroy node: {e}");
        }
        debug!(name = %self.name, %node, "destroyed node");
    }

    /// Names and types of the topics currently known to the middleware.
    pub fn get_topic_names_and_types(&self) -> Result<Vec<(String, String)>> {
        let node = self.handle.ok_or(Error::NodeDestroyed)?;
        self.context.middleware().topic_names_and_types(node)
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.destroy_node();
        }
    }
}
