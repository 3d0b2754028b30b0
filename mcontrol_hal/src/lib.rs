//! # mcontrol HAL Library
//!
//! Driver implementations of the hardware boundary defined in
//! `mcontrol_common::hal` (`Sensor`, `Motor`, `Clock`).
//!
//! # Module Structure
//!
//! - [`drivers`] - driver implementations
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                  SimulatedAxis                        │
//! │  ┌───────────┐   ┌───────────┐   ┌───────────┐        │
//! │  │ SimSensor │   │ SimMotor  │   │ SimClock  │        │
//! │  └─────┬─────┘   └─────┬─────┘   └─────┬─────┘        │
//! │        └───────────────┼───────────────┘              │
//! │                        ▼                              │
//! │              Arc<Mutex<AxisPhysics>>                  │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! The three handles share one physics model. Time only advances when the
//! controller sleeps on the `SimClock`, so a simulated slew runs as fast as
//! the host allows and is fully deterministic.

#![deny(missing_docs)]

pub mod drivers;

pub use crate::drivers::simulation::{
    MotorCommand, Obstruction, SimAxisConfig, SimClock, SimMotor, SimSensor, SimulatedAxis,
};
