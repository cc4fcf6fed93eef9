//! In-process middleware.
//!
//! [`LoopbackMiddleware`] implements [`Middleware`] without any transport:
//! published messages go straight into the queues of the subscriptions on the
//! same topic and type, requests into the queues of the matching services and
//! responses back to the requesting client. Topic and service names are
//! expanded against the creating node's namespace.
//!
//! Every call that creates or destroys something is appended to an
//! operation journal, which makes the middleware useful as a test double.
//!
//! # Example
//!
//! ```
//! use rclbind::{Context, InitOptions, LoopbackMiddleware, Operation};
//! use std::sync::Arc;
//!
//! let middleware = Arc::new(LoopbackMiddleware::new());
//! let ctx = Context::with_options(middleware.clone(), InitOptions::default().handle_signals(false))
//!     .unwrap();
//! let node = ctx.create_node("node", None).unwrap();
//! drop(node);
//!
//! assert!(matches!(middleware.operations().last(), Some(Operation::DestroyNode(_))));
//! ```

use parking_lot::{Condvar, Mutex};
use rclbind_core::{
    EntityHandle, EntityKind, Error, Middleware, NativeQos, NodeHandle, RequestId, Result,
    TypeDescriptor, names,
};
use std::{
    collections::{BTreeMap, BTreeSet, HashSet, VecDeque},
    time::{Duration, Instant},
};
use tracing::trace;

/// Implementation identifier reported by [`LoopbackMiddleware`].
pub const LOOPBACK_IDENTIFIER: &str = "rmw_loopback";

/// A call recorded by [`LoopbackMiddleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `init` succeeded.
    Init {
        /// Domain ID passed to `init`.
        domain_id: u32,
    },
    /// `shutdown` succeeded.
    Shutdown,
    /// A node was created.
    CreateNode {
        /// Handle of the new node.
        node: NodeHandle,
        /// Node name.
        name: String,
    },
    /// A node was destroyed.
    DestroyNode(NodeHandle),
    /// An entity was created.
    CreateEntity {
        /// Entity kind.
        kind: EntityKind,
        /// Handle of the new entity.
        entity: EntityHandle,
        /// Owning node.
        node: NodeHandle,
        /// Fully qualified topic or service name.
        name: String,
        /// Type name.
        type_name: String,
    },
    /// An entity was destroyed.
    DestroyEntity {
        /// Entity kind.
        kind: EntityKind,
        /// Handle of the destroyed entity.
        entity: EntityHandle,
        /// Owning node.
        node: NodeHandle,
    },
}

struct NodeInfo {
    name: String,
    namespace: String,
}

struct Sample {
    request_id: Option<RequestId>,
    payload: Vec<u8>,
}

struct EntityInfo {
    kind: EntityKind,
    node: NodeHandle,
    name: String,
    type_name: String,
    /// `None` keeps every sample.
    depth: Option<usize>,
    queue: VecDeque<Sample>,
    next_sequence: i64,
}

impl EntityInfo {
    fn push(&mut self, sample: Sample) {
        if let Some(depth) = self.depth {
            while self.queue.len() >= depth {
                self.queue.pop_front();
            }
        }
        self.queue.push_back(sample);
    }

    fn matches(&self, kind: EntityKind, name: &str, type_name: &str) -> bool {
        self.kind == kind && self.name == name && self.type_name == type_name
    }
}

#[derive(Default)]
struct State {
    initialized: bool,
    running: bool,
    next_handle: u64,
    nodes: BTreeMap<NodeHandle, NodeInfo>,
    entities: BTreeMap<EntityHandle, EntityInfo>,
    failing: HashSet<EntityHandle>,
    journal: Vec<Operation>,
}

impl State {
    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn ensure_running(&self) -> Result<()> {
        if self.initialized && self.running {
            Ok(())
        } else {
            Err(Error::NotInitialized("middleware is not running".into()))
        }
    }

    fn entity(&self, kind: EntityKind, handle: EntityHandle) -> Result<&EntityInfo> {
        self.entities
            .get(&handle)
            .filter(|e| e.kind == kind)
            .ok_or(Error::InvalidHandle(kind))
    }

    fn entity_mut(&mut self, kind: EntityKind, handle: EntityHandle) -> Result<&mut EntityInfo> {
        self.entities
            .get_mut(&handle)
            .filter(|e| e.kind == kind)
            .ok_or(Error::InvalidHandle(kind))
    }

    fn create_entity(
        &mut self,
        kind: EntityKind,
        node: NodeHandle,
        type_support: &TypeDescriptor,
        name: &str,
        qos: &NativeQos,
    ) -> Result<EntityHandle> {
        self.ensure_running()?;
        let info = self
            .nodes
            .get(&node)
            .ok_or_else(|| Error::Middleware(format!("unknown {node}")))?;
        let name = names::expand_topic_name(&info.namespace, &info.name, name)?;

        let entity = EntityHandle(self.allocate());
        self.journal.push(Operation::CreateEntity {
            kind,
            entity,
            node,
            name: name.clone(),
            type_name: type_support.name().to_string(),
        });
        self.entities.insert(
            entity,
            EntityInfo {
                kind,
                node,
                name,
                type_name: type_support.name().to_string(),
                depth: (!qos.keeps_all()).then_some(qos.depth.max(1)),
                queue: VecDeque::new(),
                next_sequence: 1,
            },
        );
        Ok(entity)
    }

    fn deliver(&mut self, kind: EntityKind, name: &str, type_name: &str, sample: &Sample) -> usize {
        let mut delivered = 0;
        for info in self.entities.values_mut() {
            if info.matches(kind, name, type_name) {
                info.push(Sample {
                    request_id: sample.request_id,
                    payload: sample.payload.clone(),
                });
                delivered += 1;
            }
        }
        delivered
    }
}

/// Middleware delivering messages within the current process.
#[derive(Default)]
pub struct LoopbackMiddleware {
    state: Mutex<State>,
    ready: Condvar,
}

impl LoopbackMiddleware {
    /// Create an uninitialized middleware.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far, oldest first.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().journal.clone()
    }

    /// Forget the recorded calls.
    pub fn clear_operations(&self) {
        self.state.lock().journal.clear();
    }

    /// Number of nodes alive in the middleware.
    pub fn node_count(&self) -> usize {
        self.state.lock().nodes.len()
    }

    /// Number of entities alive in the middleware.
    pub fn entity_count(&self) -> usize {
        self.state.lock().entities.len()
    }

    /// Make the next `destroy_node_entity` of `entity` fail. The entity stays alive.
    pub fn fail_destroy(&self, entity: EntityHandle) {
        self.state.lock().failing.insert(entity);
    }
}

impl Middleware for LoopbackMiddleware {
    fn implementation_identifier(&self) -> &str {
        LOOPBACK_IDENTIFIER
    }

    fn init(&self, _args: &[String], domain_id: u32) -> Result<()> {
        let mut state = self.state.lock();
        if state.initialized && state.running {
            return Err(Error::AlreadyInitialized(
                "middleware already initialized".into(),
            ));
        }
        state.initialized = true;
        state.running = true;
        state.journal.push(Operation::Init { domain_id });
        Ok(())
    }

    fn ok(&self) -> bool {
        let state = self.state.lock();
        state.initialized && state.running
    }

    fn shutdown(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.ensure_running()?;
        state.running = false;
        state.journal.push(Operation::Shutdown);
        self.ready.notify_all();
        Ok(())
    }

    fn create_node(&self, name: &str, namespace: &str) -> Result<NodeHandle> {
        let mut state = self.state.lock();
        state.ensure_running()?;
        let node = NodeHandle(state.allocate());
        state.nodes.insert(
            node,
            NodeInfo {
                name: name.to_string(),
                namespace: namespace.to_string(),
            },
        );
        state.journal.push(Operation::CreateNode {
            node,
            name: name.to_string(),
        });
        Ok(node)
    }

    fn destroy_node(&self, node: NodeHandle) -> Result<()> {
        let mut state = self.state.lock();
        if state.nodes.remove(&node).is_none() {
            return Err(Error::Middleware(format!("unknown {node}")));
        }
        state.entities.retain(|_, e| e.node != node);
        state.journal.push(Operation::DestroyNode(node));
        Ok(())
    }

    fn create_publisher(
        &self,
        node: NodeHandle,
        type_support: &TypeDescriptor,
        topic_name: &str,
        qos: &NativeQos,
    ) -> Result<EntityHandle> {
        self.state
            .lock()
            .create_entity(EntityKind::Publisher, node, type_support, topic_name, qos)
    }

    fn create_subscription(
        &self,
        node: NodeHandle,
        type_support: &TypeDescriptor,
        topic_name: &str,
        qos: &NativeQos,
    ) -> Result<EntityHandle> {
        self.state
            .lock()
            .create_entity(EntityKind::Subscription, node, type_support, topic_name, qos)
    }

    fn create_client(
        &self,
        node: NodeHandle,
        type_support: &TypeDescriptor,
        service_name: &str,
        qos: &NativeQos,
    ) -> Result<EntityHandle> {
        self.state
            .lock()
            .create_entity(EntityKind::Client, node, type_support, service_name, qos)
    }

    fn create_service(
        &self,
        node: NodeHandle,
        type_support: &TypeDescriptor,
        service_name: &str,
        qos: &NativeQos,
    ) -> Result<EntityHandle> {
        self.state
            .lock()
            .create_entity(EntityKind::Service, node, type_support, service_name, qos)
    }

    fn destroy_node_entity(
        &self,
        kind: EntityKind,
        entity: EntityHandle,
        node: NodeHandle,
    ) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing.remove(&entity) {
            return Err(Error::Middleware(format!("failed to destroy {kind} {entity}")));
        }
        if state.entity(kind, entity)?.node != node {
            return Err(Error::InvalidHandle(kind));
        }
        state.entities.remove(&entity);
        state
            .journal
            .push(Operation::DestroyEntity { kind, entity, node });
        Ok(())
    }

    fn topic_names_and_types(&self, node: NodeHandle) -> Result<Vec<(String, String)>> {
        let state = self.state.lock();
        if !state.nodes.contains_key(&node) {
            return Err(Error::Middleware(format!("unknown {node}")));
        }
        let topics: BTreeSet<(String, String)> = state
            .entities
            .values()
            .filter(|e| matches!(e.kind, EntityKind::Publisher | EntityKind::Subscription))
            .map(|e| (e.name.clone(), e.type_name.clone()))
            .collect();
        Ok(topics.into_iter().collect())
    }

    fn publish(&self, publisher: EntityHandle, payload: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        let info = state.entity(EntityKind::Publisher, publisher)?;
        let (name, type_name) = (info.name.clone(), info.type_name.clone());
        let sample = Sample {
            request_id: None,
            payload: payload.to_vec(),
        };
        let delivered = state.deliver(EntityKind::Subscription, &name, &type_name, &sample);
        trace!(topic = %name, delivered, "published");
        self.ready.notify_all();
        Ok(())
    }

    fn send_request(&self, client: EntityHandle, payload: &[u8]) -> Result<i64> {
        let mut state = self.state.lock();
        let info = state.entity_mut(EntityKind::Client, client)?;
        let sequence = info.next_sequence;
        info.next_sequence += 1;
        let (name, type_name) = (info.name.clone(), info.type_name.clone());
        let sample = Sample {
            request_id: Some(RequestId {
                writer: client,
                sequence,
            }),
            payload: payload.to_vec(),
        };
        state.deliver(EntityKind::Service, &name, &type_name, &sample);
        self.ready.notify_all();
        Ok(sequence)
    }

    fn send_response(
        &self,
        service: EntityHandle,
        request_id: RequestId,
        payload: &[u8],
    ) -> Result<()> {
        let mut state = self.state.lock();
        state.entity(EntityKind::Service, service)?;
        // The requesting client may be gone already; the response is dropped then.
        if let Ok(client) = state.entity_mut(EntityKind::Client, request_id.writer) {
            client.push(Sample {
                request_id: Some(request_id),
                payload: payload.to_vec(),
            });
            self.ready.notify_all();
        }
        Ok(())
    }

    fn wait(
        &self,
        entities: &[EntityHandle],
        timeout: Option<Duration>,
    ) -> Result<Vec<EntityHandle>> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.state.lock();
        loop {
            let ready: Vec<EntityHandle> = entities
                .iter()
                .copied()
                .filter(|h| state.entities.get(h).is_some_and(|e| !e.queue.is_empty()))
                .collect();
            if !ready.is_empty() || !state.running {
                return Ok(ready);
            }
            match deadline {
                Some(d) => {
                    if Instant::now() >= d {
                        return Ok(ready);
                    }
                    self.ready.wait_until(&mut state, d);
                }
                None => self.ready.wait(&mut state),
            }
        }
    }

    fn take(&self, subscription: EntityHandle) -> Result<Option<Vec<u8>>> {
        let mut state = self.state.lock();
        let info = state.entity_mut(EntityKind::Subscription, subscription)?;
        Ok(info.queue.pop_front().map(|s| s.payload))
    }

    fn take_request(&self, service: EntityHandle) -> Result<Option<(RequestId, Vec<u8>)>> {
        let mut state = self.state.lock();
        let info = state.entity_mut(EntityKind::Service, service)?;
        Ok(info
            .queue
            .pop_front()
            .and_then(|s| s.request_id.map(|id| (id, s.payload))))
    }

    fn take_response(&self, client: EntityHandle) -> Result<Option<(RequestId, Vec<u8>)>> {
        let mut state = self.state.lock();
        let info = state.entity_mut(EntityKind::Client, client)?;
        Ok(info
            .queue
            .pop_front()
            .and_then(|s| s.request_id.map(|id| (id, s.payload))))
    }
}
