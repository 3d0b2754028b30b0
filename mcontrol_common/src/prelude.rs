//! Prelude module for common re-exports.
//!
//! ```rust
//! use mcontrol_common::prelude::*;
//! ```

// ─── Angles ─────────────────────────────────────────────────────────
pub use crate::angle::{AngleConfig, CookedAngle, Degrees, RawAngle, UserAngle, mod360};

// ─── Hardware boundary ──────────────────────────────────────────────
pub use crate::hal::{Clock, HalError, Motor, MonotonicClock, Sensor};

// ─── Controller ─────────────────────────────────────────────────────
pub use crate::controller::{ControllerConfig, MotorStatus};

// ─── Configuration & logging ────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
