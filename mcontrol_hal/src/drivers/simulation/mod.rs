//! Simulation driver module.
//!
//! Software model of the declination axis for development and testing
//! without physical hardware.

mod config;
mod driver;
mod physics;

pub use config::{Obstruction, SimAxisConfig};
pub use driver::{SimClock, SimMotor, SimSensor, SimulatedAxis};
pub use physics::MotorCommand;
