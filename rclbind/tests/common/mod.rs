#![allow(dead_code)]

use rclbind::{
    Context, InitOptions, LoopbackMiddleware, Result, ServiceMsg, TypeDescriptor, TypeSupport,
    from_cdr, to_cdr,
};
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTwoIntsRequest {
    pub a: i64,
    pub b: i64,
}

impl TypeSupport for AddTwoIntsRequest {
    fn type_name() -> &'static str {
        "example_interfaces/srv/AddTwoInts_Request"
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        to_cdr(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        from_cdr(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTwoIntsResponse {
    pub sum: i64,
}

impl TypeSupport for AddTwoIntsResponse {
    fn type_name() -> &'static str {
        "example_interfaces/srv/AddTwoInts_Response"
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        to_cdr(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        from_cdr(bytes)
    }
}

pub struct AddTwoInts;

impl ServiceMsg for AddTwoInts {
    type Request = AddTwoIntsRequest;
    type Response = AddTwoIntsResponse;

    fn type_name() -> &'static str {
        "example_interfaces/srv/AddTwoInts"
    }
}

pub fn create_context() -> (Arc<LoopbackMiddleware>, Arc<Context>) {
    let middleware = Arc::new(LoopbackMiddleware::new());
    let ctx = Context::with_options(middleware.clone(), InitOptions::default().handle_signals(false))
        .unwrap();
    (middleware, ctx)
}
