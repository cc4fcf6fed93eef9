//! Legacy subscriber.

use crate::publisher::queue_size_profile;
use parking_lot::Mutex;
use rclbind::{Error, Node, Result, TypeSupport};
use std::sync::{Arc, OnceLock};

type Callback<T> = Box<dyn FnMut(T) + Send>;

/// Subscriber handle of the legacy API, created by
/// [`Compat::subscriber`](crate::Compat::subscriber).
///
/// Messages are handed to the callback while the facade spins.
pub struct Subscriber<T> {
    topic: String,
    queue_size: usize,
    callback: Arc<Mutex<Callback<T>>>,
    endpoint: Arc<OnceLock<rclbind::Subscription<T>>>,
    failure: Arc<OnceLock<Error>>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Subscriber {
            topic: self.topic.clone(),
            queue_size: self.queue_size,
            callback: self.callback.clone(),
            endpoint: self.endpoint.clone(),
            failure: self.failure.clone(),
        }
    }
}

impl<T: TypeSupport> Subscriber<T> {
    pub(crate) fn new<F>(topic: &str, callback: F, queue_size: usize) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        Subscriber {
            topic: topic.to_string(),
            queue_size,
            callback: Arc::new(Mutex::new(Box::new(callback))),
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

    /// True once a real subscription backs this subscriber.
    pub fn is_created(&self) -> bool {
        self.endpoint.get().is_some()
    }

    /// The backing subscription, if created.
    pub fn endpoint(&self) -> Option<&rclbind::Subscription<T>> {
        self.endpoint.get()
    }

    /// The error that prevented creating the subscription, if any.
    pub fn creation_error(&self) -> Option<&Error> {
        self.failure.get()
    }

    /// Create the backing subscription on `node`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyCreated`] if this subscriber was already
    /// realized, or the node's error if creation fails.
    pub fn realize(&self, node: &mut Node) -> Result<()> {
        if self.is_created() {
            return Err(Error::AlreadyCreated(format!(
                "subscriber on '{}'",
                self.topic
            )));
        }
        let callback = self.callback.clone();
        let subscription = node
            .create_subscription::<T, _>(
                &self.topic,
                move |msg| (*callback.lock())(msg),
                Some(queue_size_profile(self.queue_size)),
            )
            .inspect_err(|e| {
                let _ = self.failure.set(e.clone());
            })?;
        if self.endpoint.set(subscription).is_err() {
            return Err(Error::AlreadyCreated(format!(
                "subscriber on '{}'",
                self.topic
            )));
        }
        Ok(())
    }
}
