//! Node layer of the rclbind ROS2 client binding.
//!
//! A [`Context`] initializes a [`Middleware`](rclbind_core::Middleware).
//! [`Node`]s created from it own publishers, subscriptions, clients and
//! services, and tear them down when destroyed. Inbound data is dispatched
//! to callbacks by [`spin_once`] and [`spin`].
//!
//! [`LoopbackMiddleware`] delivers everything in-process and records the
//! calls made to it.
//!
//! # Example
//!
//! ```
//! use rclbind::{Context, InitOptions, LoopbackMiddleware, spin_once};
//! use serde::{Deserialize, Serialize};
//! use std::{
//!     sync::{Arc, Mutex},
//!     time::Duration,
//! };
//!
//! #[derive(Serialize, Deserialize)]
//! struct Chatter {
//!     data: String,
//! }
//!
//! impl rclbind::TypeSupport for Chatter {
//!     fn type_name() -> &'static str {
//!         "std_msgs/msg/String"
//!     }
//!
//!     fn to_bytes(&self) -> rclbind::Result<Vec<u8>> {
//!         rclbind::to_cdr(self)
//!     }
//!
//!     fn from_bytes(bytes: &[u8]) -> rclbind::Result<Self> {
//!         rclbind::from_cdr(bytes)
//!     }
//! }
//!
//! let ctx = Context::with_options(
//!     Arc::new(LoopbackMiddleware::new()),
//!     InitOptions::default().handle_signals(false),
//! )
//! .unwrap();
//! let mut node = ctx.create_node("talker", None).unwrap();
//!
//! let received = Arc::new(Mutex::new(Vec::new()));
//! let sink = received.clone();
//! node.create_subscription::<Chatter, _>("chatter", move |msg| sink.lock().unwrap().push(msg.data), None)
//!     .unwrap();
//! let publisher = node.create_publisher::<Chatter>("chatter", None).unwrap();
//!
//! publisher.publish(&Chatter { data: "hello".into() }).unwrap();
//! spin_once(&mut node, Some(Duration::from_millis(10))).unwrap();
//! assert_eq!(*received.lock().unwrap(), vec!["hello".to_string()]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod context;
mod entity;
mod executor;
mod loopback;
mod node;

pub mod logger;
pub mod service;
pub mod topic;

pub use context::{Context, InitOptions, ROS_DOMAIN_ID};
pub use entity::EntityRecord;
pub use executor::{SPIN_PERIOD, spin, spin_once, spin_until_response};
pub use loopback::{LOOPBACK_IDENTIFIER, LoopbackMiddleware, Operation};
pub use node::Node;
pub use service::{client::Client, server::Service};
pub use topic::{publisher::Publisher, subscription::Subscription};

pub use rclbind_core;
pub use rclbind_core::{
    EntityHandle, EntityKind, Error, Middleware, NodeHandle, Profile, RequestId, Result,
    ServiceMsg, TypeDescriptor, TypeSupport, from_cdr, to_cdr,
};
