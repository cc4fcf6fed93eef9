//! Quality of Service (QoS) policies and profiles.
//!
//! A [`Profile`] is what applications pass when creating endpoints. The
//! middleware never sees it directly: [`Profile::to_native`] converts it into
//! the flat [`NativeQos`] record handed across the middleware boundary.

use std::time::Duration;

/// QoS history policy - how samples are stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HistoryPolicy {
    /// Implementation default for history policy.
    SystemDefault,

    /// Only store up to a maximum number of samples, dropping oldest once max is exceeded.
    KeepLast,

    /// Store all samples, subject to resource limits.
    KeepAll,
}

/// QoS reliability policy - how messages are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReliabilityPolicy {
    /// Implementation specific default.
    SystemDefault,

    /// Guarantee that samples are delivered, may retry multiple times.
    Reliable,

    /// Attempt to deliver samples, but some may be lost if the network is not robust.
    BestEffort,
}

/// QoS durability policy - how samples persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityPolicy {
    /// Implementation specific default.
    SystemDefault,

    /// The publisher is responsible for persisting samples for "late-joining" subscribers.
    TransientLocal,

    /// Samples are not persistent.
    Volatile,
}

/// A named bundle of delivery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Keep last: only store up to `depth` samples.
    /// Keep all: store all samples, subject to the configured resource limits.
    pub history: HistoryPolicy,

    /// Size of the message queue.
    pub depth: usize,

    /// Reliability QoS policy setting.
    pub reliability: ReliabilityPolicy,

    /// Durability QoS policy setting.
    pub durability: DurabilityPolicy,

    /// The age at which messages are considered expired.
    /// Zero duration means unspecified.
    pub lifespan: Duration,

    /// If true, any ROS specific namespacing conventions will be circumvented.
    pub avoid_ros_namespace_conventions: bool,
}

impl Default for Profile {
    /// Default QoS profile for topics:
    /// - History: Keep last
    /// - Depth: 10
    /// - Reliability: Reliable
    /// - Durability: Volatile
    fn default() -> Self {
        Self {
            history: HistoryPolicy::KeepLast,
            depth: 10,
            reliability: ReliabilityPolicy::Reliable,
            durability: DurabilityPolicy::Volatile,
            lifespan: Duration::ZERO,
            avoid_ros_namespace_conventions: false,
        }
    }
}

impl Profile {
    /// Services QoS profile:
    /// - History: Keep last
    /// - Depth: 10
    /// - Reliability: Reliable
    /// - Durability: Volatile
    pub const fn services_default() -> Self {
        Self {
            history: HistoryPolicy::KeepLast,
            depth: 10,
            reliability: ReliabilityPolicy::Reliable,
            durability: DurabilityPolicy::Volatile,
            lifespan: Duration::ZERO,
            avoid_ros_namespace_conventions: false,
        }
    }

    /// Sensor Data QoS profile:
    /// - History: Keep last
    /// - Depth: 5
    /// - Reliability: Best effort
    /// - Durability: Volatile
    pub const fn sensor_data() -> Self {
        Self {
            history: HistoryPolicy::KeepLast,
            depth: 5,
            reliability: ReliabilityPolicy::BestEffort,
            durability: DurabilityPolicy::Volatile,
            lifespan: Duration::ZERO,
            avoid_ros_namespace_conventions: false,
        }
    }

    /// Returns a copy of this profile keeping the last `depth` samples.
    pub fn keep_last(mut self, depth: usize) -> Self {
        self.history = HistoryPolicy::KeepLast;
        self.depth = depth;
        self
    }

    /// Convert into the representation handed to the middleware.
    pub fn to_native(&self) -> NativeQos {
        NativeQos {
            history: match self.history {
                HistoryPolicy::SystemDefault => 0,
                HistoryPolicy::KeepLast => 1,
                HistoryPolicy::KeepAll => 2,
            },
            depth: self.depth,
            reliability: match self.reliability {
                ReliabilityPolicy::SystemDefault => 0,
                ReliabilityPolicy::Reliable => 1,
                ReliabilityPolicy::BestEffort => 2,
            },
            durability: match self.durability {
                DurabilityPolicy::SystemDefault => 0,
                DurabilityPolicy::TransientLocal => 1,
                DurabilityPolicy::Volatile => 2,
            },
            lifespan_ns: u64::try_from(self.lifespan.as_nanos()).unwrap_or(u64::MAX),
            avoid_ros_namespace_conventions: self.avoid_ros_namespace_conventions,
        }
    }
}

/// Middleware-native QoS record, laid out like `rmw_qos_profile_t`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeQos {
    /// 0 = system default, 1 = keep last, 2 = keep all.
    pub history: u8,
    /// Queue depth.
    pub depth: usize,
    /// 0 = system default, 1 = reliable, 2 = best effort.
    pub reliability: u8,
    /// 0 = system default, 1 = transient local, 2 = volatile.
    pub durability: u8,
    /// Lifespan in nanoseconds, 0 when unspecified.
    pub lifespan_ns: u64,
    /// Skip ROS namespacing conventions.
    pub avoid_ros_namespace_conventions: bool,
}

impl NativeQos {
    /// True when the history keeps every sample.
    pub fn keeps_all(&self) -> bool {
        self.history == 2
    }
}
