//! Driver implementations.
//!
//! - [`simulation`] - software axis model for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement `Sensor` and `Motor` from `mcontrol_common::hal`
//! 3. Add export and documentation

pub mod simulation;
