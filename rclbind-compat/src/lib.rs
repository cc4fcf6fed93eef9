//! Legacy single-node API on top of rclbind.
//!
//! [`Compat`] offers the old style of writing a node: one `init_node` call,
//! publishers and subscribers that may be built before it, a blocking
//! [`spin`](Compat::spin), printf-like logging helpers and a [`Rate`].

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod facade;
mod pending;
mod publisher;
mod rate;
mod subscriber;

pub mod logging;

pub use facade::Compat;
pub use logging::{Severity, format_log, logdebug, logerr, logfatal, loginfo, logwarn};
pub use pending::{PendingKind, PendingRegistry, PendingRequest};
pub use publisher::{Publisher, queue_size_profile};
pub use rate::Rate;
pub use subscriber::Subscriber;
