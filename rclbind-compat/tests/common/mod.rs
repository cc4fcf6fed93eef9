#![allow(dead_code)]

use rclbind::{InitOptions, LoopbackMiddleware, Result, TypeDescriptor, TypeSupport, from_cdr, to_cdr};
use rclbind_compat::Compat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Int64 {
    pub data: i64,
}

impl TypeSupport for Int64 {
    fn type_name() -> &'static str {
        "example_interfaces/msg/Int64"
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        to_cdr(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        from_cdr(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringMsg {
    pub data: String,
}

impl TypeSupport for StringMsg {
    fn type_name() -> &'static str {
        "std_msgs/msg/String"
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        to_cdr(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        from_cdr(bytes)
    }
}

/// A message whose type support library is not installed.
#[derive(Debug, Serialize, Deserialize)]
pub struct Missing;

impl TypeSupport for Missing {
    fn type_name() -> &'static str {
        "missing_msgs/msg/Missing"
    }

    fn import_type_support() -> Option<TypeDescriptor> {
        None
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        to_cdr(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        from_cdr(bytes)
    }
}

pub fn create_compat() -> (Arc<LoopbackMiddleware>, Compat) {
    let middleware = Arc::new(LoopbackMiddleware::new());
    let compat = Compat::with_options(middleware.clone(), InitOptions::default().handle_signals(false));
    (middleware, compat)
}
