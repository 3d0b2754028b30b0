//! Simulation parameters.
//!
//! Loaded from the optional `[simulation]` table of the controller
//! configuration; every field has a default.

use mcontrol_common::consts::PARK_POSITION_DEFAULT;
use serde::{Deserialize, Serialize};

/// Default axis speed at 100% duty [deg/s].
pub const SPEED_AT_FULL_DUTY_DEFAULT: f64 = 20.0;

/// Default number of motor commands kept for inspection.
pub const COMMAND_LOG_CAPACITY_DEFAULT: usize = 10_000;

/// Wall on the axis path that stops motion in one direction.
///
/// Motion in `direction` (sign of travel, `+1` or `-1`) cannot pass `at`
/// [cooked deg]. Motion away from the wall is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstruction {
    /// Position of the wall [cooked deg].
    pub at: f64,
    /// Blocked direction of travel (sign only).
    #[serde(default = "default_direction")]
    pub direction: f64,
    /// Number of motor reversals after which the wall disappears
    /// (`None` = permanent).
    #[serde(default)]
    pub clears_after_reversals: Option<u32>,
}

fn default_direction() -> f64 {
    1.0
}

/// Axis model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimAxisConfig {
    /// Axis position at startup [cooked deg]. Parked by default.
    pub start_position: f64,
    /// Speed at 100% duty [deg/s]. Speed is proportional to duty.
    pub speed_at_full_duty: f64,
    /// Duty magnitude below which static friction holds the axis [%].
    pub breakaway_duty: f64,
    /// Motor leads swapped: positive duty moves the axis backwards.
    pub reversed_wiring: bool,
    /// Optional obstruction on the path.
    pub obstruction: Option<Obstruction>,
    /// Most recent motor commands kept in the log. `0` disables recording.
    pub command_log_capacity: usize,
}

impl Default for SimAxisConfig {
    fn default() -> Self {
        Self {
            start_position: PARK_POSITION_DEFAULT,
            speed_at_full_duty: SPEED_AT_FULL_DUTY_DEFAULT,
            breakaway_duty: 0.0,
            reversed_wiring: false,
            obstruction: None,
            command_log_capacity: COMMAND_LOG_CAPACITY_DEFAULT,
        }
    }
}
