//! Context of the binding.
//!
//! A [`Context`] initializes a [`Middleware`], owns the type support
//! registry shared by its nodes and answers the cooperative shutdown query
//! [`Context::ok`].
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
//! let node = ctx.create_node("talker", None).unwrap();
//! assert_eq!(node.fully_qualified_name(), "/talker");
//! ```

use crate::node::Node;
use rclbind_core::{Error, Middleware, Result, TypeSupportRegistry};
use signal_hook::{
    SigId,
    consts::{SIGINT, SIGTERM},
};
use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::{debug, info, warn};

/// Environment variable for the ROS domain ID.
pub const ROS_DOMAIN_ID: &str = "ROS_DOMAIN_ID";

/// Options used to initialize a [`Context`].
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Arguments handed to the middleware.
    pub args: Vec<String>,
    /// ROS domain ID.
    pub domain_id: u32,
    /// Register SIGINT and SIGTERM handlers that make [`Context::ok`] false.
    pub handle_signals: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            domain_id: 0,
            handle_signals: true,
        }
    }
}

impl InitOptions {
    /// Options from the process arguments and `ROS_DOMAIN_ID` (default: 0).
    pub fn from_env() -> Self {
        let domain_id = env::var(ROS_DOMAIN_ID)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        Self {
            args: env::args().collect(),
            domain_id,
            handle_signals: true,
        }
    }

    /// Set the arguments handed to the middleware.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the domain ID.
    pub fn domain_id(mut self, domain_id: u32) -> Self {
        self.domain_id = domain_id;
        self
    }

    /// Enable or disable signal handling.
    pub fn handle_signals(mut self, enable: bool) -> Self {
        self.handle_signals = enable;
        self
    }
}

/// An initialized middleware and the state shared by its nodes.
pub struct Context {
    middleware: Arc<dyn Middleware>,
    type_support: TypeSupportRegistry,
    domain_id: u32,
    interrupted: Arc<AtomicBool>,
    signal_ids: Vec<SigId>,
}

impl Context {
    /// Initialize `middleware` with [`InitOptions::from_env`].
    pub fn new(middleware: Arc<dyn Middleware>) -> Result<Arc<Self>> {
        Self::with_options(middleware, InitOptions::from_env())
    }

    /// Initialize `middleware` with explicit options.
    ///
    /// # Errors
    ///
    /// Fails if the middleware refuses to initialize, for instance because it
    /// is already initialized, or if the signal handlers cannot be installed.
    pub fn with_options(middleware: Arc<dyn Middleware>, options: InitOptions) -> Result<Arc<Self>> {
        middleware.init(&options.args, options.domain_id)?;

        let interrupted = Arc::new(AtomicBool::new(false));
        let mut signal_ids = Vec::new();
        if options.handle_signals {
            for signal in [SIGINT, SIGTERM] {
                let id = signal_hook::flag::register(signal, interrupted.clone())
                    .map_err(|e| Error::Other(format!("failed to register signal {signal}: {e}")))?;
                signal_ids.push(id);
            }
        }

        info!(
            implementation = middleware.implementation_identifier(),
            domain_id = options.domain_id,
            "context initialized"
        );

        Ok(Arc::new(Context {
            middleware,
            type_support: TypeSupportRegistry::new(),
            domain_id: options.domain_id,
            interrupted,
            signal_ids,
        }))
    }

    /// The middleware this context was initialized with.
    pub fn middleware(&self) -> &Arc<dyn Middleware> {
        &self.middleware
    }

    /// Type supports resolved by the nodes of this context.
    pub fn type_support(&self) -> &TypeSupportRegistry {
        &self.type_support
    }

    /// Get the ROS domain ID.
    pub fn domain_id(&self) -> u32 {
        self.domain_id
    }

    /// False once the middleware was shut down or a termination signal arrived.
    pub fn ok(&self) -> bool {
        !self.interrupted.load(Ordering::SeqCst) && self.middleware.ok()
    }

    /// Shut the middleware down. Does nothing if it is already stopped.
    pub fn shutdown(&self) -> Result<()> {
        if !self.middleware.ok() {
            return Ok(());
        }
        info!("shutting down");
        self.middleware.shutdown()
    }

    /// Create a new node.
    ///
    /// # Arguments
    ///
    /// * `name` - The node name (must be a valid ROS2 name)
    /// * `namespace` - Optional namespace (defaults to "/")
    pub fn create_node(self: &Arc<Self>, name: &str, namespace: Option<&str>) -> Result<Node> {
        Node::new(self.clone(), name, namespace.unwrap_or(""))
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        for id in self.signal_ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
        if self.middleware.ok()
            && let Err(e) = self.middleware.shutdown()
        {
            warn!("failed to shut down middleware: {e}");
        }
        debug!("context dropped");
    }
}
