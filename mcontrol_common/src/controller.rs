//! Controller tunables and motor health classification.
//!
//! `ControllerConfig` is immutable after load. Numeric parameters have
//! `MIN`/`MAX` bounds in [`crate::consts`], checked by
//! [`ControllerConfig::validate`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::angle::{CookedAngle, Degrees};
use crate::consts::{
    ACCEL_ANGLE_DEFAULT, DESTALL_DURATION_MS_DEFAULT, DESTALL_DUTY_DEFAULT, DUTY_MAX, DUTY_MIN,
    LOOP_DELAY_MS_DEFAULT, LOOP_DELAY_MS_MAX, LOOP_DELAY_MS_MIN, MAX_DESTALL_ATTEMPTS_DEFAULT,
    MAX_DESTALL_ATTEMPTS_MAX, MAX_DUTY_DEFAULT, MAX_REVERSALS_DEFAULT, MAX_REVERSALS_MAX, MIN_DUTY_DEFAULT, PARK_POSITION_DEFAULT,
    STALL_CHECK_PERIOD_MS_DEFAULT, STALL_THRESHOLD_DEFAULT, TOLERANCE_DEFAULT, TOLERANCE_MAX,
};

/// Motor health as seen by the stall monitor.
///
/// Re-evaluated every stall check period during a slew and reset at the
/// start of each slew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum MotorStatus {
    /// No full check period observed since monitoring (re)started.
    #[default]
    Undetermined = 0,
    /// Moving in the commanded direction.
    Ok = 1,
    /// Commanded to move but not moving.
    Stalled = 2,
    /// Moving against the commanded direction. Fatal for the slew.
    WrongDirection = 3,
}

/// Tunables of one axis controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    // ── Motor ──
    /// Lowest duty magnitude commanded while moving [%].
    pub min_duty: f64,
    /// Highest duty magnitude commanded [%].
    pub max_duty: f64,
    /// Negate every duty before it reaches the motor.
    pub invert_motor_polarity: bool,
    /// Interval between stall evaluations.
    pub stall_check_period: Duration,
    /// Displacement per check period below which the motor counts as
    /// stalled [deg].
    pub stall_threshold: Degrees,
    /// Reverse duty of the destall pulse [%].
    pub destall_duty: f64,
    /// Length of the destall pulse.
    pub destall_duration: Duration,
    /// Destall pulses allowed per slew before a stall is fatal.
    pub max_destall_attempts: u32,

    // ── Movement ──
    /// Where `park()` slews to.
    pub park_position: CookedAngle,
    /// Distance before the target over which the duty tapers [deg].
    pub accel_angle: Degrees,
    /// Arrival tolerance [deg].
    pub tolerance: Degrees,
    /// Direction reversals allowed per slew. One more fails the slew.
    pub max_reversals: u32,

    // ── Control loop ──
    /// Control loop period.
    pub loop_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_duty: MIN_DUTY_DEFAULT,
            max_duty: MAX_DUTY_DEFAULT,
            invert_motor_polarity: false,
            stall_check_period: Duration::from_millis(STALL_CHECK_PERIOD_MS_DEFAULT),
            stall_threshold: STALL_THRESHOLD_DEFAULT,
            destall_duty: DESTALL_DUTY_DEFAULT,
            destall_duration: Duration::from_millis(DESTALL_DURATION_MS_DEFAULT),
            max_destall_attempts: MAX_DESTALL_ATTEMPTS_DEFAULT,
            park_position: CookedAngle::new(PARK_POSITION_DEFAULT),
            accel_angle: ACCEL_ANGLE_DEFAULT,
            tolerance: TOLERANCE_DEFAULT,
            max_reversals: MAX_REVERSALS_DEFAULT,
            loop_delay: Duration::from_millis(LOOP_DELAY_MS_DEFAULT),
        }
    }
}

fn check_duty(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || !(DUTY_MIN..=DUTY_MAX).contains(&value) {
        return Err(format!(
            "{name} {value} out of range [{DUTY_MIN}, {DUTY_MAX}]"
        ));
    }
    Ok(())
}

impl ControllerConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        check_duty("min_duty", self.min_duty)?;
        check_duty("max_duty", self.max_duty)?;
        check_duty("destall_duty", self.destall_duty)?;
        if self.min_duty > self.max_duty {
            return Err(format!(
                "min_duty {} exceeds max_duty {}",
                self.min_duty, self.max_duty
            ));
        }
        if self.max_duty <= 0.0 {
            return Err("max_duty must be positive".to_string());
        }

        let loop_ms = self.loop_delay.as_millis() as u64;
        if !(LOOP_DELAY_MS_MIN..=LOOP_DELAY_MS_MAX).contains(&loop_ms) {
            return Err(format!(
                "loop_delay_ms {loop_ms} out of range [{LOOP_DELAY_MS_MIN}, {LOOP_DELAY_MS_MAX}]"
            ));
        }
        if self.stall_check_period < self.loop_delay {
            return Err(format!(
                "stall_check_period {:?} shorter than loop_delay {:?}",
                self.stall_check_period, self.loop_delay
            ));
        }
        if !self.stall_threshold.is_finite() || self.stall_threshold < 0.0 {
            return Err(format!(
                "stall_threshold {} must be finite and non-negative",
                self.stall_threshold
            ));
        }
        if self.max_destall_attempts > MAX_DESTALL_ATTEMPTS_MAX {
            return Err(format!(
                "max_destall_attempts {} out of range [0, {MAX_DESTALL_ATTEMPTS_MAX}]",
                self.max_destall_attempts
            ));
        }

        if !self.tolerance.is_finite() || self.tolerance <= 0.0 || self.tolerance > TOLERANCE_MAX {
            return Err(format!(
                "tolerance {} out of range (0, {TOLERANCE_MAX}]",
                self.tolerance
            ));
        }
        if !self.accel_angle.is_finite() || self.accel_angle < 0.0 {
            return Err(format!(
                "accel_angle {} must be finite and non-negative",
                self.accel_angle
            ));
        }
        if self.max_reversals > MAX_REVERSALS_MAX {
            return Err(format!(
                "max_reversals {} out of range [0, {MAX_REVERSALS_MAX}]",
                self.max_reversals
            ));
        }
        if !self.park_position.val().is_finite() {
            return Err("park_position must be finite".to_string());
        }
        Ok(())
    }
}
