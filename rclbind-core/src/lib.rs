//! Core traits and types for the rclbind ROS2 client binding.
//!
//! This crate holds everything that does not depend on a particular
//! middleware: errors, QoS profiles, message traits, type support
//! resolution, handles, name rules and the [`Middleware`] trait itself.

pub mod error;
pub mod handle;
pub mod middleware;
pub mod msg;
pub mod names;
pub mod qos;
pub mod type_support;

pub use error::{DynError, Error, Result};
pub use handle::{EntityHandle, EntityKind, NodeHandle, RequestId};
pub use middleware::Middleware;
pub use msg::{ServiceMsg, TypeDescriptor, TypeKind, TypeSupport, from_cdr, to_cdr};
pub use qos::{DurabilityPolicy, HistoryPolicy, NativeQos, Profile, ReliabilityPolicy};
pub use type_support::TypeSupportRegistry;
