//! Simulation driver implementation.
//!
//! `SimulatedAxis` owns the physics model and hands out `SimSensor`,
//! `SimMotor` and `SimClock`, which implement the `mcontrol_common::hal`
//! traits against that shared model.

use std::sync::Arc;
use std::time::Duration;

use mcontrol_common::angle::{AngleConfig, CookedAngle, RawAngle, mod360};
use mcontrol_common::consts::DUTY_MAX;
use mcontrol_common::hal::{Clock, HalError, Motor, Sensor};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::config::SimAxisConfig;
use super::physics::{AxisPhysics, MotorCommand};

/// Simulated declination axis.
///
/// Positions exposed by this type are cooked angles; the sensor handle
/// converts them back to raw readings with the axis angle configuration,
/// so the controller sees the same readings a real encoder would produce.
#[derive(Clone)]
pub struct SimulatedAxis {
    physics: Arc<Mutex<AxisPhysics>>,
    angles: Arc<AngleConfig>,
}

impl SimulatedAxis {
    /// Create a simulated axis.
    pub fn new(config: SimAxisConfig, angles: Arc<AngleConfig>) -> Self {
        info!(
            "Simulated axis at {:.3}° cooked, {:.1}°/s at full duty",
            config.start_position, config.speed_at_full_duty
        );
        Self {
            physics: Arc::new(Mutex::new(AxisPhysics::new(config))),
            angles,
        }
    }

    /// Sensor handle.
    pub fn sensor(&self) -> SimSensor {
        SimSensor {
            physics: Arc::clone(&self.physics),
            angles: Arc::clone(&self.angles),
        }
    }

    /// Motor handle.
    pub fn motor(&self) -> SimMotor {
        SimMotor {
            physics: Arc::clone(&self.physics),
        }
    }

    /// Clock handle. Sleeping on it advances the simulation.
    pub fn clock(&self) -> SimClock {
        SimClock {
            physics: Arc::clone(&self.physics),
        }
    }

    /// Current cooked position, normalized to `[0, 360)`.
    pub fn position(&self) -> CookedAngle {
        CookedAngle::new(mod360(self.physics.lock().position))
    }

    /// Move the axis instantly.
    pub fn set_position(&self, position: CookedAngle) {
        self.physics.lock().position = position.val();
    }

    /// Motor commands received so far, up to `command_log_capacity` most recent.
    pub fn commands(&self) -> Vec<MotorCommand> {
        self.physics.lock().commands.iter().copied().collect()
    }

    /// Forget recorded motor commands.
    pub fn clear_commands(&self) {
        self.physics.lock().commands.clear();
    }

    /// Number of direction reversals seen by the motor.
    pub fn reversals(&self) -> u32 {
        self.physics.lock().reversals()
    }

    /// Make sensor reads fail (`true`) or succeed again (`false`).
    pub fn set_sensor_fault(&self, fault: bool) {
        debug!("Simulated sensor fault: {fault}");
        self.physics.lock().sensor_fault = fault;
    }

    /// Simulation time.
    pub fn elapsed(&self) -> Duration {
        self.physics.lock().time
    }
}

/// Simulated absolute angle sensor.
pub struct SimSensor {
    physics: Arc<Mutex<AxisPhysics>>,
    angles: Arc<AngleConfig>,
}

impl Sensor for SimSensor {
    fn read(&mut self) -> Result<RawAngle, HalError> {
        let physics = self.physics.lock();
        if physics.sensor_fault {
            return Err(HalError::CommunicationError(
                "simulated sensor fault".to_string(),
            ));
        }
        Ok(self
            .angles
            .uncook(CookedAngle::new(mod360(physics.position))))
    }
}

/// Simulated drive motor.
pub struct SimMotor {
    physics: Arc<Mutex<AxisPhysics>>,
}

impl Motor for SimMotor {
    fn set_duty(&mut self, duty: f64) -> Result<(), HalError> {
        if !duty.is_finite() || duty.abs() > DUTY_MAX {
            return Err(HalError::InvalidDuty(duty));
        }
        self.physics.lock().apply_duty(duty);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), HalError> {
        self.physics.lock().stop();
        Ok(())
    }
}

/// Simulation clock.
///
/// `now()` reports simulation time; `sleep()` integrates the physics model
/// instead of blocking.
#[derive(Clone)]
pub struct SimClock {
    physics: Arc<Mutex<AxisPhysics>>,
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        self.physics.lock().time
    }

    fn sleep(&self, duration: Duration) {
        self.physics.lock().advance(duration);
    }
}
