//! Logging through `tracing`.
//!
//! The binding logs with the `tracing` macros. [`init_logging`] installs a
//! subscriber writing to stderr, filtered by `RUST_LOG` (default `info`),
//! and forwards `log` crate records to it.
//!
//! # Example
//!
//! ```
//! use rclbind::logger::{info, init_logging};
//!
//! init_logging("talker");
//! info!("node started");
//! log::warn!("forwarded from the log crate");
//! ```

use std::sync::OnceLock;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static LOGGER_NAME: OnceLock<String> = OnceLock::new();

/// Install the process-wide subscriber.
///
/// Only the first call has an effect; later calls, and calls made after
/// another global subscriber was installed, are ignored.
pub fn init_logging(name: &str) {
    LOGGER_NAME.get_or_init(|| {
        tracing_log::LogTracer::init().ok();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .ok();

        name.to_string()
    });
}

/// Name given to the first [`init_logging`] call.
pub fn logger_name() -> Option<&'static str> {
    LOGGER_NAME.get().map(String::as_str)
}

pub use tracing::{debug, error, info, trace, warn};
