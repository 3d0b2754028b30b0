//! Duty taper.
//!
//! Full `max_duty` while the target is farther than `accel_angle`, then a
//! linear ramp proportional to the remaining distance, floored at
//! `min_duty` so the axis keeps moving against friction.
//!
//! ```text
//!  duty
//!   max ┤──────────╮
//!       │           ╲
//!   min ┤            ╰──┤
//!       └───────────────┴──▶ |delta|
//!                    accel  0
//! ```

use mcontrol_common::angle::Degrees;
use mcontrol_common::controller::ControllerConfig;

/// Unsigned duty magnitude for a remaining distance of `distance` degrees.
#[inline]
pub fn duty_magnitude(distance: Degrees, config: &ControllerConfig) -> f64 {
    if config.accel_angle <= 0.0 {
        return config.max_duty;
    }
    (config.max_duty * distance.abs() / config.accel_angle)
        .min(config.max_duty)
        .max(config.min_duty)
}

/// Signed duty for `delta = target - current`, with motor polarity applied.
#[inline]
pub fn slew_duty(delta: Degrees, config: &ControllerConfig) -> f64 {
    let signed = duty_magnitude(delta, config).copysign(delta);
    if config.invert_motor_polarity {
        -signed
    } else {
        signed
    }
}
