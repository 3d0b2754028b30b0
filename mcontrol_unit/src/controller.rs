//! Declination axis controller.
//!
//! `Controller` owns the sensor and motor of one axis and runs blocking
//! slews on the calling thread:
//!
//! ```text
//!   slew(target)
//!      │  reject: already slewing / unsafe target / unsafe start / unsafe path
//!      ▼
//!   ┌─▶ cancelled? ─────────────────────────────▶ stop, Cancelled
//!   │   sample → unsafe? ──────────────────────▶ stop, UnsafePosition
//!   │   |delta| <= tolerance? ─────────────────▶ stop, Arrived
//!   │   reversed too often? ───────────────────▶ stop, Hunting
//!   │   duty = taper(delta) → motor
//!   │   monitor: Stalled → destall pulse (bounded) ─▶ stop, Stalled
//!   │            WrongDirection ──────────────────▶ stop, WrongDirection
//!   └── sleep(loop_delay)
//! ```
//!
//! The motor is only commanded once the slew passes every pre-check, and
//! every exit after that leaves it stopped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use mcontrol_common::angle::{AngleConfig, CookedAngle, RawAngle, UserAngle, mod360};
use mcontrol_common::config::ConfigError;
use mcontrol_common::controller::{ControllerConfig, MotorStatus};
use mcontrol_common::hal::{Clock, HalError, Motor, MonotonicClock, Sensor};
use parking_lot::Mutex;
use static_assertions::assert_impl_all;
use tracing::{debug, error, info, trace, warn};

use crate::control::duty::slew_duty;
use crate::error::SlewError;
use crate::state::motor::MotorMonitor;

// ─── Cancellation ───────────────────────────────────────────────────

/// Cooperative cancellation flag for a running slew.
///
/// Clones share the flag. The slew loop polls it once per iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Re-arm the token for another slew.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ─── Outcome ────────────────────────────────────────────────────────

/// How a slew ended without fault.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlewOutcome {
    /// Within tolerance of the target.
    Arrived { position: CookedAngle },
    /// Stopped on request before arrival.
    Cancelled { position: CookedAngle },
}

impl SlewOutcome {
    /// Axis position when the slew ended.
    pub fn position(&self) -> CookedAngle {
        match self {
            Self::Arrived { position } | Self::Cancelled { position } => *position,
        }
    }

    pub fn is_arrived(&self) -> bool {
        matches!(self, Self::Arrived { .. })
    }
}

/// Holds the controller's slewing flag for the duration of one slew.
struct SlewGuard<'a>(&'a AtomicBool);

impl<'a> SlewGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SlewError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| SlewError::AlreadySlewing)
    }
}

impl Drop for SlewGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ─── Controller ─────────────────────────────────────────────────────

/// Single-axis slew controller.
pub struct Controller<S, M, C = MonotonicClock> {
    config: ControllerConfig,
    angles: Arc<AngleConfig>,
    sensor: Mutex<S>,
    motor: Mutex<M>,
    clock: C,
    slewing: AtomicBool,
}

assert_impl_all!(Controller<Box<dyn Sensor>, Box<dyn Motor>, MonotonicClock>: Send, Sync);

impl<S: Sensor, M: Motor, C: Clock> Controller<S, M, C> {
    /// Create a controller. Fails if `config` is out of bounds.
    pub fn new(
        config: ControllerConfig,
        angles: Arc<AngleConfig>,
        sensor: S,
        motor: M,
        clock: C,
    ) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(Self {
            config,
            angles,
            sensor: Mutex::new(sensor),
            motor: Mutex::new(motor),
            clock,
            slewing: AtomicBool::new(false),
        })
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn angles(&self) -> &AngleConfig {
        &self.angles
    }

    /// Whether a slew is running.
    pub fn is_slewing(&self) -> bool {
        self.slewing.load(Ordering::Acquire)
    }

    // ─── Position ───────────────────────────────────────────────────

    /// Current sensor reading.
    pub fn raw_angle(&self) -> Result<RawAngle, HalError> {
        let raw = self.sensor.lock().read()?;
        if !raw.val().is_finite() {
            return Err(HalError::InvalidReading(raw.val()));
        }
        trace!("Sensor: {raw}");
        Ok(raw)
    }

    /// Current position in the controller frame.
    pub fn cooked_angle(&self) -> Result<CookedAngle, HalError> {
        Ok(self.angles.cook(self.raw_angle()?))
    }

    /// Current position on the operator scale.
    pub fn user_angle(&self) -> Result<UserAngle, HalError> {
        Ok(self.angles.to_user(self.cooked_angle()?))
    }

    // ─── Motion ─────────────────────────────────────────────────────

    /// Slew to `target` and block until arrival, cancellation or fault.
    pub fn slew(&self, target: CookedAngle, cancel: &CancelToken) -> Result<SlewOutcome, SlewError> {
        let _guard = SlewGuard::acquire(&self.slewing)?;

        let target = CookedAngle::new(mod360(target.val()));
        if !self.angles.is_safe(target) {
            warn!("Slew rejected: target {target} inside forbidden arc");
            return Err(SlewError::UnsafeTarget { target });
        }
        let start = self.cooked_angle()?;
        if !self.angles.is_safe(start) {
            warn!("Slew rejected: axis at {start} inside forbidden arc");
            return Err(SlewError::UnsafeStart { position: start });
        }
        if !self.angles.path_is_safe(start, target) {
            warn!("Slew rejected: path {start} -> {target} crosses forbidden arc");
            return Err(SlewError::UnsafePath {
                from: start,
                to: target,
            });
        }

        info!("Slew {start} -> {target}");
        let mut driven = false;
        let result = self.run(target, cancel, &mut driven);
        if result.is_err() && driven {
            self.halt();
        }
        result
    }

    /// Slew to an operator-scale angle.
    pub fn slew_user(&self, target: UserAngle, cancel: &CancelToken) -> Result<SlewOutcome, SlewError> {
        self.slew(self.angles.from_user(target), cancel)
    }

    /// Slew to the configured park position.
    pub fn park(&self, cancel: &CancelToken) -> Result<SlewOutcome, SlewError> {
        info!("Parking at {}", self.config.park_position);
        self.slew(self.config.park_position, cancel)
    }

    fn run(
        &self,
        target: CookedAngle,
        cancel: &CancelToken,
        driven: &mut bool,
    ) -> Result<SlewOutcome, SlewError> {
        let cfg = &self.config;
        let mut monitor = MotorMonitor::new(cfg.stall_check_period, cfg.stall_threshold);
        let mut direction = 0.0;
        let mut destalls = 0u32;
        let mut reversals = 0u32;

        loop {
            if cancel.is_cancelled() {
                if *driven {
                    self.motor.lock().stop()?;
                }
                let position = self.cooked_angle()?;
                info!("Slew cancelled at {position}");
                return Ok(SlewOutcome::Cancelled { position });
            }

            let current = self.cooked_angle()?;
            if !self.angles.is_safe(current) {
                error!("Axis entered forbidden arc at {current}");
                return Err(SlewError::UnsafePosition { position: current });
            }

            let delta = target - current;
            if delta.abs() <= cfg.tolerance {
                if *driven {
                    self.motor.lock().stop()?;
                }
                info!("Arrived at {current} ({delta:+.3}° from target)");
                return Ok(SlewOutcome::Arrived { position: current });
            }

            let wanted = delta.signum();
            if wanted != direction {
                if direction != 0.0 {
                    reversals += 1;
                    if reversals > cfg.max_reversals {
                        error!("Axis hunting around {target}, {reversals} reversals at {current}");
                        return Err(SlewError::Hunting {
                            position: current,
                            reversals,
                        });
                    }
                    debug!("Direction change {reversals} at {current}");
                }
                monitor.begin(current, self.clock.now());
                direction = wanted;
            }

            let duty = slew_duty(delta, cfg);
            trace!("At {current}, delta {delta:+.3}°, duty {duty:+.1}%");
            self.motor.lock().set_duty(duty)?;
            *driven = true;

            match monitor.check(current, self.clock.now(), wanted) {
                MotorStatus::Stalled => {
                    if destalls >= cfg.max_destall_attempts {
                        error!("Motor stalled at {current}, {destalls} destall attempts spent");
                        return Err(SlewError::Stalled {
                            position: current,
                            attempts: destalls,
                        });
                    }
                    destalls += 1;
                    warn!(
                        "Motor stalled at {current}, destall attempt {destalls}/{}",
                        cfg.max_destall_attempts
                    );
                    self.destall(duty)?;
                    monitor.begin(self.cooked_angle()?, self.clock.now());
                    continue;
                }
                MotorStatus::WrongDirection => {
                    let displacement = monitor.last_displacement();
                    error!("Axis moving against commanded direction at {current} ({displacement:+.3}°)");
                    return Err(SlewError::WrongDirection {
                        position: current,
                        displacement,
                    });
                }
                MotorStatus::Ok | MotorStatus::Undetermined => {}
            }

            self.clock.sleep(cfg.loop_delay);
        }
    }

    /// Drive against `duty` at `destall_duty` for `destall_duration`.
    fn destall(&self, duty: f64) -> Result<(), HalError> {
        let reverse = -self.config.destall_duty.copysign(duty);
        debug!(
            "Destall pulse {reverse:+.1}% for {:?}",
            self.config.destall_duration
        );
        self.motor.lock().set_duty(reverse)?;
        self.clock.sleep(self.config.destall_duration);
        Ok(())
    }

    /// Best-effort stop on a failure path.
    fn halt(&self) {
        if let Err(e) = self.motor.lock().stop() {
            error!("Failed to stop motor: {e}");
        }
    }
}
