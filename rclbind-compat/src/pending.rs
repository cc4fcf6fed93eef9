//! Endpoint requests waiting for a node.
//!
//! Legacy publishers and subscribers constructed before
//! [`Compat::init_node`](crate::Compat::init_node) are captured here as plain
//! requests. Each request carries a closure that realizes it against a
//! [`Node`]. `init_node` drains the registry once, in arrival order, and it
//! stays empty afterward. The facade keeps a second registry for endpoints
//! requested while its node is busy spinning; that one is drained between
//! spin iterations.

use rclbind::{Node, Result};
use std::collections::VecDeque;
use tracing::{debug, warn};

pub(crate) type Realize = Box<dyn FnOnce(&mut Node) -> Result<()> + Send>;

/// Which legacy endpoint a request builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    /// A legacy publisher.
    Publisher,
    /// A legacy subscriber.
    Subscriber,
}

/// Construction parameters of a legacy endpoint that has no node yet.
pub struct PendingRequest {
    arrival: u64,
    kind: PendingKind,
    topic: String,
    type_name: &'static str,
    queue_size: usize,
    realize: Realize,
}

impl PendingRequest {
    /// Publisher or subscriber.
    pub fn kind(&self) -> PendingKind {
        self.kind
    }

    /// Topic name given at construction.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Message type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Requested queue size.
    pub fn queue_size(&self) -> usize {
        self.queue_size
    }
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("arrival", &self.arrival)
            .field("kind", &self.kind)
            .field("topic", &self.topic)
            .field("type_name", &self.type_name)
            .field("queue_size", &self.queue_size)
            .finish_non_exhaustive()
    }
}

/// Publisher and subscriber requests queued until a node exists.
#[derive(Debug, Default)]
pub struct PendingRegistry {
    next_arrival: u64,
    publishers: VecDeque<PendingRequest>,
    subscribers: VecDeque<PendingRequest>,
}

impl PendingRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(
        &mut self,
        kind: PendingKind,
        topic: &str,
        type_name: &'static str,
        queue_size: usize,
        realize: Realize,
    ) {
        let request = PendingRequest {
            arrival: self.next_arrival,
            kind,
            topic: topic.to_string(),
            type_name,
            queue_size,
            realize,
        };
        self.next_arrival += 1;
        debug!(?kind, topic, type_name, "queued until init_node");
        match kind {
            PendingKind::Publisher => self.publishers.push_back(request),
            PendingKind::Subscriber => self.subscribers.push_back(request),
        }
    }

    /// Number of queued requests.
    pub fn len(&self) -> usize {
        self.publishers.len() + self.subscribers.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queued requests in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingRequest> + '_ {
        let mut all: Vec<_> = self.publishers.iter().chain(&self.subscribers).collect();
        all.sort_by_key(|r| r.arrival);
        all.into_iter()
    }

    fn pop_oldest(&mut self) -> Option<PendingRequest> {
        let subscriber_first = match (self.publishers.front(), self.subscribers.front()) {
            (Some(p), Some(s)) => s.arrival < p.arrival,
            (Some(_), None) => false,
            (None, _) => true,
        };
        if subscriber_first {
            self.subscribers.pop_front()
        } else {
            self.publishers.pop_front()
        }
    }

    /// Realize every queued request against `node`, oldest first.
    ///
    /// A request that fails to realize is logged and skipped; its handle
    /// keeps the error. Returns the number of requests realized.
    pub(crate) fn drain(&mut self, node: &mut Node) -> usize {
        let mut realized = 0;
        while let Some(request) = self.pop_oldest() {
            let PendingRequest {
                kind,
                topic,
                type_name,
                realize,
                ..
            } = request;
            match realize(&mut *node) {
                Ok(()) => realized += 1,
                Err(e) => warn!(?kind, %topic, type_name, "failed to create deferred endpoint: {e}"),
            }
        }
        realized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rclbind::{Context, InitOptions, LoopbackMiddleware};
    use std::sync::Arc;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &str) -> Realize {
        let log = log.clone();
        let label = label.to_string();
        Box::new(move |_node: &mut Node| {
            log.lock().push(label);
            Ok(())
        })
    }

    #[test]
    fn test_drain_in_arrival_order() {
        let ctx = Context::with_options(
            Arc::new(LoopbackMiddleware::new()),
            InitOptions::default().handle_signals(false),
        )
        .unwrap();
        let mut node = ctx.create_node("pending", None).unwrap();

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PendingRegistry::new();
        registry.push(PendingKind::Subscriber, "a", "t", 1, recorder(&log, "sub a"));
        registry.push(PendingKind::Publisher, "b", "t", 1, recorder(&log, "pub b"));
        registry.push(PendingKind::Subscriber, "c", "t", 1, recorder(&log, "sub c"));
        registry.push(
            PendingKind::Publisher,
            "d",
            "t",
            1,
            Box::new(|_: &mut Node| Err(rclbind::Error::Other("boom".into()))),
        );
        registry.push(PendingKind::Publisher, "e", "t", 1, recorder(&log, "pub e"));

        let topics: Vec<_> = registry.iter().map(|r| r.topic().to_string()).collect();
        assert_eq!(topics, ["a", "b", "c", "d", "e"]);
        assert_eq!(registry.len(), 5);

        assert_eq!(registry.drain(&mut node), 4);
        assert!(registry.is_empty());
        assert_eq!(*log.lock(), ["sub a", "pub b", "sub c", "pub e"]);
    }
}
