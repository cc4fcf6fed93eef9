//! Legacy publisher.
//!
//! A [`Publisher`] may be constructed before the facade has a node. Until
//! then it is not backed by a real endpoint and [`Publisher::publish`]
//! fails with [`Error::EndpointNotCreated`]. If creating the endpoint failed,
//! `publish` returns that failure instead.

use rclbind::{Error, Node, Profile, Result, TypeSupport, rclbind_core::HistoryPolicy};
use std::sync::{Arc, OnceLock};

/// QoS profile for a legacy `queue_size`. Zero keeps every message.
pub fn queue_size_profile(queue_size: usize) -> Profile {
    if queue_size == 0 {
        Profile {
            history: HistoryPolicy::KeepAll,
            ..Profile::default()
        }
    } else {
        Profile::default().keep_last(queue_size)
    }
}

/// Publisher handle of the legacy API, created by
/// [`Compat::publisher`](crate::Compat::publisher).
pub struct Publisher<T> {
    topic: String,
    queue_size: usize,
    endpoint: Arc<OnceLock<rclbind::Publisher<T>>>,
    failure: Arc<OnceLock<Error>>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Publisher {
            topic: self.topic.clone(),
            queue_size: self.queue_size,
            endpoint: self.endpoint.clone(),
            failure: self.failure.clone(),
        }
    }
}

impl<T: TypeSupport> Publisher<T> {
    pub(crate) fn new(topic: &str, queue_size: usize) -> Self {
        Publisher {
            topic: topic.to_string(),
            queue_size,
            endpoint: Arc::new(OnceLock::new()),
            failure: Arc::new(OnceLock::new()),
        }
    }

    /// Topic name given at construction.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Queue size given at construction.
    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    /// True once a real endpoint backs this publisher.
    pub fn is_created(&self) -> bool {
        self.endpoint.get().is_some()
    }

    /// The backing endpoint, if created.
    pub fn endpoint(&self) -> Option<&rclbind::Publisher<T>> {
        self.endpoint.get()
    }

    /// The error that prevented creating the endpoint, if any.
    pub fn creation_error(&self) -> Option<&Error> {
        self.failure.get()
    }

    /// Create the backing endpoint on `node`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyCreated`] if this publisher is already backed
    /// by an endpoint, or the node's error if creation fails.
    pub fn realize(&self, node: &mut Node) -> Result<()> {
        if self.is_created() {
            return Err(Error::AlreadyCreated(format!(
                "publisher on '{}'",
                self.topic
            )));
        }
        let publisher = node
            .create_publisher::<T>(&self.topic, Some(queue_size_profile(self.queue_size)))
            .inspect_err(|e| {
                let _ = self.failure.set(e.clone());
            })?;
        if self.endpoint.set(publisher).is_err() {
            return Err(Error::AlreadyCreated(format!(
                "publisher on '{}'",
                self.topic
            )));
        }
        Ok(())
    }

    /// Publish a message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndpointNotCreated`] before `init_node`, the error
    /// that prevented creating the endpoint, or the endpoint's error if
    /// publishing fails.
    pub fn publish(&self, msg: &T) -> Result<()> {
        if let Some(publisher) = self.endpoint.get() {
            return publisher.publish(msg);
        }
        Err(match self.failure.get() {
            Some(e) => e.clone(),
            None => Error::EndpointNotCreated(format!(
                "publisher on '{}' has no node; call init_node() first",
                self.topic
            )),
        })
    }
}
