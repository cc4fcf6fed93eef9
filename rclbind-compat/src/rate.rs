//! Fixed-rate pacing.

use rclbind::{Error, Result};
use std::{thread, time::Duration};

/// Sleeps `1/hz` seconds per call.
///
/// Time spent between calls is not compensated, so a loop doing work and
/// calling [`Rate::sleep`] runs slower than `hz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    period: Duration,
}

impl Rate {
    /// Create a rate of `hz` calls per second.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Other`] if `hz` is not a finite positive number, or
    /// if it is so small that the period does not fit a [`Duration`].
    pub fn new(hz: f64) -> Result<Self> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(Error::Other(format!("invalid rate: {hz} Hz")));
        }
        let period = Duration::try_from_secs_f64(1.0 / hz)
            .map_err(|e| Error::Other(format!("invalid rate: {hz} Hz: {e}")))?;
        Ok(Rate { period })
    }

    /// Time slept by each call to [`sleep`](Self::sleep).
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Block the calling thread for one period.
    pub fn sleep(&self) {
        thread::sleep(self.period);
    }
}
