//! The legacy single-node API.
//!
//! [`Compat`] is an explicit context object standing in for the legacy
//! global state: it owns at most one node, created by [`Compat::init_node`].
//! Publishers and subscribers built before that are queued in a
//! [`PendingRegistry`] and created the moment the node exists.
//!
//! # Example
//!
//! ```
//! use rclbind::{InitOptions, LoopbackMiddleware};
//! use rclbind_compat::Compat;
//! use std::sync::Arc;
//! # use rclbind::{Result, TypeSupport, from_cdr, to_cdr};
//! # #[derive(serde::Serialize, serde::Deserialize)]
//! # struct Chatter { data: String }
//! # impl TypeSupport for Chatter {
//! #     fn type_name() -> &'static str { "std_msgs/msg/String" }
//! #     fn to_bytes(&self) -> Result<Vec<u8>> { to_cdr(self) }
//! #     fn from_bytes(bytes: &[u8]) -> Result<Self> { from_cdr(bytes) }
//! # }
//!
//! let compat = Compat::with_options(
//!     Arc::new(LoopbackMiddleware::new()),
//!     InitOptions::default().handle_signals(false),
//! );
//!
//! let publisher = compat.publisher::<Chatter>("chatter", 10).unwrap();
//! assert!(publisher.publish(&Chatter { data: "early".into() }).is_err());
//!
//! compat.init_node("talker", false).unwrap();
//! assert!(publisher.is_created());
//! publisher.publish(&Chatter { data: "hello".into() }).unwrap();
//! assert!(compat.init_node("talker", false).is_err());
//! ```

use crate::{
    pending::{PendingKind, PendingRegistry, Realize},
    publisher::Publisher,
    subscriber::Subscriber,
};
use parking_lot::Mutex;
use rclbind::{
    Context, Error, InitOptions, Middleware, Node, Result, SPIN_PERIOD, TypeSupport, logger,
    spin_once,
};
use std::{
    process,
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, info, warn};

#[derive(Default)]
struct Inner {
    node: Option<Node>,
    spinning: bool,
    pending: PendingRegistry,
    backlog: PendingRegistry,
}

/// Legacy facade owning at most one node.
///
/// Callbacks run by [`spin`](Compat::spin) may call back into the facade.
/// While the node spins it is checked out of the facade: publishers and
/// subscribers requested meanwhile are created between two spin iterations,
/// and [`with_node`](Compat::with_node) fails with [`Error::Busy`].
pub struct Compat {
    middleware: Arc<dyn Middleware>,
    options: InitOptions,
    caller_id: OnceLock<String>,
    context: OnceLock<Arc<Context>>,
    stopped: AtomicBool,
    inner: Mutex<Inner>,
}

/// Append a suffix unique to this process and moment.
fn anonymous_name(name: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{name}_{}_{millis}", process::id())
}

fn not_initialized() -> Error {
    Error::NotInitialized("no node; did you call init_node()?".into())
}

impl Compat {
    /// Facade over `middleware`, initialized with [`InitOptions::from_env`].
    pub fn new(middleware: Arc<dyn Middleware>) -> Self {
        Self::with_options(middleware, InitOptions::from_env())
    }

    /// Facade over `middleware` with explicit options.
    pub fn with_options(middleware: Arc<dyn Middleware>, options: InitOptions) -> Self {
        Compat {
            middleware,
            options,
            caller_id: OnceLock::new(),
            context: OnceLock::new(),
            stopped: AtomicBool::new(false),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Initialize the middleware, create the node and realize every queued
    /// publisher and subscriber in construction order.
    ///
    /// With `anonymous`, a suffix made of the process ID and the current
    /// time is appended to `name`. A queued endpoint that cannot be created
    /// is logged and skipped; its handle returns the error when used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyInitialized`] on a second successful call,
    /// leaving the existing node untouched. Middleware and name errors are
    /// returned as is and leave the facade uninitialized.
    pub fn init_node(&self, name: &str, anonymous: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        if let Some(caller_id) = self.caller_id.get() {
            return Err(Error::AlreadyInitialized(format!(
                "init_node() already called for '{caller_id}'"
            )));
        }

        let name = if anonymous {
            anonymous_name(name)
        } else {
            name.to_string()
        };
        logger::init_logging(&name);

        let context = Context::with_options(self.middleware.clone(), self.options.clone())?;
        let mut node = context.create_node(&name, None)?;

        let queued = inner.pending.len();
        let realized = inner.pending.drain(&mut node);
        if realized < queued {
            warn!(queued, realized, "some deferred endpoints were not created");
        }

        let caller_id = node.fully_qualified_name();
        info!(node = %caller_id, realized, "node initialized");
        inner.node = Some(node);
        let _ = self.context.set(context);
        let _ = self.caller_id.set(caller_id);
        Ok(())
    }

    /// True once [`init_node`](Self::init_node) succeeded.
    pub fn is_initialized(&self) -> bool {
        self.caller_id.get().is_some()
    }

    /// True unless the node is up and the middleware running.
    pub fn is_shutdown(&self) -> bool {
        self.stopped.load(Ordering::SeqCst) || self.context.get().is_none_or(|c| !c.ok())
    }

    /// Fully qualified name of the node, empty before `init_node`.
    pub fn get_caller_id(&self) -> String {
        self.caller_id.get().cloned().unwrap_or_default()
    }

    /// Wall-clock time in seconds since the UNIX epoch.
    pub fn get_time(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default()
    }

    /// Number of publishers and subscribers waiting for `init_node`.
    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Run `f` on the node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before `init_node`, [`Error::Busy`]
    /// while [`spin`](Self::spin) runs and [`Error::NodeDestroyed`] after
    /// [`shutdown`](Self::shutdown).
    pub fn with_node<R>(&self, f: impl FnOnce(&mut Node) -> R) -> Result<R> {
        let mut inner = self.inner.lock();
        let node = self.node_mut(&mut inner)?;
        Ok(f(node))
    }

    fn node_mut<'a>(&self, inner: &'a mut Inner) -> Result<&'a mut Node> {
        if !self.is_initialized() {
            return Err(not_initialized());
        }
        if inner.spinning {
            return Err(Error::Busy("the node is spinning".into()));
        }
        inner.node.as_mut().ok_or(Error::NodeDestroyed)
    }

    /// Realize now if the node is available, queue otherwise.
    fn realize_or_queue(
        &self,
        kind: PendingKind,
        topic: &str,
        type_name: &'static str,
        queue_size: usize,
        realize: Realize,
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        if !self.is_initialized() {
            inner.pending.push(kind, topic, type_name, queue_size, realize);
            return Ok(());
        }
        if self.stopped.load(Ordering::SeqCst) {
            return Err(Error::NodeDestroyed);
        }
        if inner.spinning {
            inner.backlog.push(kind, topic, type_name, queue_size, realize);
            return Ok(());
        }
        realize(self.node_mut(&mut inner)?)
    }

    /// Create a publisher, or queue it if `init_node` has not run yet.
    ///
    /// `queue_size` becomes the history depth; `0` keeps every message.
    pub fn publisher<T: TypeSupport>(&self, topic: &str, queue_size: usize) -> Result<Publisher<T>> {
        let publisher = Publisher::<T>::new(topic, queue_size);
        let deferred = publisher.clone();
        self.realize_or_queue(
            PendingKind::Publisher,
            topic,
            T::type_name(),
            queue_size,
            Box::new(move |node: &mut Node| deferred.realize(node)),
        )?;
        Ok(publisher)
    }

    /// Create a subscriber, or queue it if `init_node` has not run yet.
    ///
    /// `callback` runs for every message taken by [`spin`](Self::spin).
    pub fn subscriber<T, F>(&self, topic: &str, callback: F, queue_size: usize) -> Result<Subscriber<T>>
    where
        T: TypeSupport,
        F: FnMut(T) + Send + 'static,
    {
        let subscriber = Subscriber::<T>::new(topic, callback, queue_size);
        let deferred = subscriber.clone();
        self.realize_or_queue(
            PendingKind::Subscriber,
            topic,
            T::type_name(),
            queue_size,
            Box::new(move |node: &mut Node| deferred.realize(node)),
        )?;
        Ok(subscriber)
    }

    /// Dispatch callbacks until the context stops being ok or
    /// [`shutdown`](Self::shutdown) is called.
    ///
    /// The facade is not locked while callbacks run, so they may use it,
    /// and other threads can call `shutdown` meanwhile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before `init_node` and
    /// [`Error::Busy`] if another thread is already spinning. After
    /// `shutdown` this returns immediately.
    pub fn spin(&self) -> Result<()> {
        let context = self.context.get().ok_or_else(not_initialized)?.clone();
        let mut node = {
            let mut inner = self.inner.lock();
            if self.stopped.load(Ordering::SeqCst) {
                return Ok(());
            }
            self.node_mut(&mut inner)?;
            let node = inner.node.take().ok_or(Error::NodeDestroyed)?;
            inner.spinning = true;
            node
        };
        debug!("spinning");

        let mut result = Ok(());
        while context.ok() && !self.stopped.load(Ordering::SeqCst) {
            if let Err(e) = spin_once(&mut node, Some(SPIN_PERIOD)) {
                result = Err(e);
                break;
            }
            self.inner.lock().backlog.drain(&mut node);
        }

        let mut inner = self.inner.lock();
        inner.spinning = false;
        if self.stopped.load(Ordering::SeqCst) {
            node.destroy_node();
            let shutdown = context.shutdown();
            return result.and(shutdown);
        }
        inner.backlog.drain(&mut node);
        inner.node = Some(node);
        result
    }

    /// Destroy the node and shut the middleware down.
    ///
    /// The facade stays initialized: `init_node` cannot be called again.
    /// Called while the node spins, the spinning thread does the teardown
    /// once its current iteration is over. Calling this twice is a no-op.
    pub fn shutdown(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        let Some(context) = self.context.get() else {
            return Ok(());
        };
        self.stopped.store(true, Ordering::SeqCst);
        if inner.spinning {
            return Ok(());
        }
        if let Some(mut node) = inner.node.take() {
            node.destroy_node();
        }
        context.shutdown()
    }
}

impl Drop for Compat {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("failed to shut down: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_name() {
        let name = anonymous_name("listener");
        let prefix = format!("listener_{}_", process::id());
        assert!(name.starts_with(&prefix));
        assert!(name[prefix.len()..].chars().all(|c| c.is_ascii_digit()));
    }
}
