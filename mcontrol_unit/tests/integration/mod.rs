//! Shared rig for the integration tests.

mod concurrency;
mod config;
mod safety;
mod slew;
mod stall;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use mcontrol_common::angle::{AngleConfig, CookedAngle, RawAngle};
use mcontrol_common::controller::ControllerConfig;
use mcontrol_common::hal::Clock;
use mcontrol_hal::{MotorCommand, SimAxisConfig, SimClock, SimMotor, SimSensor, SimulatedAxis};
use mcontrol_unit::Controller;

/// Reference mount with the forbidden arc around the cooked seam.
pub fn angles() -> Arc<AngleConfig> {
    arc_angles(350.0, 10.0)
}

pub fn arc_angles(min: f64, max: f64) -> Arc<AngleConfig> {
    Arc::new(
        AngleConfig::new(RawAngle::new(230.0))
            .with_user_origin(CookedAngle::new(20.0))
            .unwrap()
            .with_safe_limits(CookedAngle::new(min), CookedAngle::new(max))
            .unwrap(),
    )
}

/// Tunables with a real destall pulse and a noise threshold.
pub fn tuning() -> ControllerConfig {
    ControllerConfig {
        stall_threshold: 0.2,
        destall_duty: 40.0,
        destall_duration: Duration::from_millis(300),
        park_position: CookedAngle::new(180.0),
        ..Default::default()
    }
}

pub fn sim(start: f64) -> SimAxisConfig {
    SimAxisConfig {
        start_position: start,
        ..Default::default()
    }
}

pub struct Rig {
    pub axis: SimulatedAxis,
    pub controller: Controller<SimSensor, SimMotor, SimClock>,
}

pub fn rig_with(sim: SimAxisConfig, config: ControllerConfig, angles: Arc<AngleConfig>) -> Rig {
    let axis = SimulatedAxis::new(sim, Arc::clone(&angles));
    let controller =
        Controller::new(config, angles, axis.sensor(), axis.motor(), axis.clock()).unwrap();
    Rig { axis, controller }
}

pub fn rig(sim: SimAxisConfig) -> Rig {
    rig_with(sim, tuning(), angles())
}

/// Duty values of every `Duty` command, in order.
pub fn duties(commands: &[MotorCommand]) -> Vec<f64> {
    commands
        .iter()
        .filter_map(|c| match c {
            MotorCommand::Duty { duty, .. } => Some(*duty),
            MotorCommand::Stop { .. } => None,
        })
        .collect()
}

pub fn ends_stopped(commands: &[MotorCommand]) -> bool {
    matches!(commands.last(), Some(MotorCommand::Stop { .. }))
}

/// Simulation clock that calls `hook(n)` before the n-th sleep.
pub struct HookClock<F> {
    inner: SimClock,
    sleeps: AtomicU32,
    hook: F,
}

impl<F: Fn(u32) + Send + Sync> HookClock<F> {
    pub fn new(inner: SimClock, hook: F) -> Self {
        Self {
            inner,
            sleeps: AtomicU32::new(0),
            hook,
        }
    }
}

impl<F: Fn(u32) + Send + Sync> Clock for HookClock<F> {
    fn now(&self) -> Duration {
        self.inner.now()
    }

    fn sleep(&self, duration: Duration) {
        let n = self.sleeps.fetch_add(1, Ordering::SeqCst) + 1;
        (self.hook)(n);
        self.inner.sleep(duration);
    }
}
