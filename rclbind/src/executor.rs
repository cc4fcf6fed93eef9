//! Spinning: waiting on a node's inbound entities and running their callbacks.
//!
//! Callbacks run synchronously on the spinning thread. One call to
//! [`spin_once`] waits on every subscription, service and client of the
//! node and takes at most one item from each entity that became ready.

use crate::{
    entity::{Entity, Handler},
    node::Node,
    service::client::Client,
};
use rclbind_core::{EntityHandle, Error, Middleware, RequestId, Result, ServiceMsg};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// How long [`spin`] blocks before re-checking [`Context::ok`](crate::Context::ok).
pub const SPIN_PERIOD: Duration = Duration::from_millis(100);

/// Wait up to `timeout` (`None`: until data or shutdown) and dispatch what
/// became ready.
///
/// Returns the number of callbacks run.
///
/// # Errors
///
/// Returns [`Error::NodeDestroyed`] if the node was destroyed, or the
/// middleware error if waiting or taking fails. Callback and
/// deserialization failures are logged, not returned.
pub fn spin_once(node: &mut Node, timeout: Option<Duration>) -> Result<usize> {
    if !node.is_valid() {
        return Err(Error::NodeDestroyed);
    }
    let middleware = node.context().middleware().clone();

    let waitables: Vec<EntityHandle> = node
        .subscriptions
        .iter()
        .chain(&node.services)
        .chain(&node.clients)
        .map(|e| e.record.handle)
        .collect();

    let ready = middleware.wait(&waitables, timeout)?;
    let mut dispatched = 0;
    for handle in ready {
        if let Some(entity) = find(&mut node.subscriptions, handle) {
            dispatched += take_message(middleware.as_ref(), entity)?;
        } else if let Some(entity) = find(&mut node.services, handle) {
            dispatched += take_request(middleware.as_ref(), entity)?;
        } else if let Some(entity) = find(&mut node.clients, handle) {
            dispatched += take_response(middleware.as_ref(), entity)?;
        }
    }
    Ok(dispatched)
}

/// Spin until the context stops being [`ok`](crate::Context::ok).
pub fn spin(node: &mut Node) -> Result<()> {
    let context = node.context().clone();
    while context.ok() {
        spin_once(node, Some(SPIN_PERIOD))?;
    }
    Ok(())
}

/// Spin until the response to `request_id` arrives.
///
/// # Errors
///
/// Returns [`Error::Timeout`] when `timeout` elapses first and
/// [`Error::NotInitialized`] when the context shuts down first.
pub fn spin_until_response<T: ServiceMsg>(
    node: &mut Node,
    client: &Client<T>,
    request_id: RequestId,
    timeout: Option<Duration>,
) -> Result<T::Response> {
    let deadline = timeout.map(|t| Instant::now() + t);
    let context = node.context().clone();
    loop {
        if let Some(response) = client.take_response(request_id) {
            return Ok(response);
        }
        if !context.ok() {
            return Err(Error::NotInitialized("context was shut down".into()));
        }
        let period = match deadline {
            Some(d) => {
                let remaining = d.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(Error::Timeout);
                }
                remaining.min(SPIN_PERIOD)
            }
            None => SPIN_PERIOD,
        };
        spin_once(node, Some(period))?;
    }
}

fn find(entities: &mut [Entity], handle: EntityHandle) -> Option<&mut Entity> {
    entities.iter_mut().find(|e| e.record.handle == handle)
}

fn take_message(middleware: &dyn Middleware, entity: &mut Entity) -> Result<usize> {
    let Some(bytes) = middleware.take(entity.record.handle)? else {
        return Ok(0);
    };
    if let Handler::Message(callback) = &mut entity.handler {
        trace!(topic = %entity.record.name, "dispatching message");
        if let Err(e) = callback(&bytes) {
            warn!(topic = %entity.record.name, "dropped message: {e}");
        }
    }
    Ok(1)
}

fn take_request(middleware: &dyn Middleware, entity: &mut Entity) -> Result<usize> {
    let Some((request_id, bytes)) = middleware.take_request(entity.record.handle)? else {
        return Ok(0);
    };
    if let Handler::Request(callback) = &mut entity.handler {
        trace!(service = %entity.record.name, "dispatching request");
        match callback(&bytes) {
            Ok(response) => middleware.send_response(entity.record.handle, request_id, &response)?,
            Err(e) => warn!(service = %entity.record.name, "dropped request: {e}"),
        }
    }
    Ok(1)
}

fn take_response(middleware: &dyn Middleware, entity: &mut Entity) -> Result<usize> {
    let Some((request_id, bytes)) = middleware.take_response(entity.record.handle)? else {
        return Ok(0);
    };
    if let Handler::Response(callback) = &mut entity.handler
        && let Err(e) = callback(request_id, &bytes)
    {
        warn!(service = %entity.record.name, "dropped response: {e}");
    }
    Ok(1)
}
