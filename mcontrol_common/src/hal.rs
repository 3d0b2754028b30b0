//! Hardware boundary of the controller.
//!
//! This module defines:
//! - `Sensor` - reads the raw axis angle
//! - `Motor` - accepts signed duty commands
//! - `Clock` - monotonic time source and loop pacing
//! - `HalError` - error types for hardware operations
//!
//! Drivers live outside the core; `mcontrol_hal` provides a simulation
//! driver implementing all three traits.

use std::time::{Duration, Instant};
use thiserror::Error;

use crate::angle::RawAngle;

/// Error types for hardware operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Hardware communication error
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),

    /// Sensor returned something that is not an angle
    #[error("Sensor reading out of range: {0}")]
    InvalidReading(f64),

    /// Duty command rejected by the driver
    #[error("Motor rejected duty {0}%")]
    InvalidDuty(f64),
}

/// Absolute angle sensor on the axis.
///
/// Latency and blocking are the driver's concern; the controller treats a
/// read as synchronous.
pub trait Sensor: Send {
    /// Read the current raw angle.
    fn read(&mut self) -> Result<RawAngle, HalError>;
}

/// Axis drive motor.
pub trait Motor: Send {
    /// Drive at a signed duty percentage. The sign selects the direction;
    /// the controller keeps the magnitude within its configured bounds and
    /// applies the configured polarity.
    fn set_duty(&mut self, duty: f64) -> Result<(), HalError>;

    /// Remove drive.
    fn stop(&mut self) -> Result<(), HalError>;
}

/// Monotonic time source used for stall timing and loop pacing.
///
/// Wall-clock jumps must never show up in `now()`.
pub trait Clock: Send + Sync {
    /// Time elapsed since an arbitrary fixed epoch.
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

impl<T: Sensor + ?Sized> Sensor for Box<T> {
    fn read(&mut self) -> Result<RawAngle, HalError> {
        (**self).read()
    }
}

impl<T: Motor + ?Sized> Motor for Box<T> {
    fn set_duty(&mut self, duty: f64) -> Result<(), HalError> {
        (**self).set_duty(duty)
    }

    fn stop(&mut self) -> Result<(), HalError> {
        (**self).stop()
    }
}

/// `Clock` backed by `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
