//! # mcontrol Unit Library
//!
//! Slew controller for a single telescope declination axis. Drives the
//! motor toward a target cooked angle, tapering the duty near the target,
//! while watching for stalls, wrong-direction motion and excursions into
//! the forbidden arc.
//!
//! ## Layers
//!
//! 1. **Controller** ([`controller`]): slew loop, park, position reads
//! 2. **Motor monitor** ([`state::motor`]): per-period stall classification
//! 3. **Duty taper** ([`control::duty`]): remaining distance → signed duty
//! 4. **Configuration** ([`config`]): TOML schema, validation, defaults
//!
//! ## Threading
//!
//! `slew()` blocks its caller on the controller's `Clock`. Position reads
//! may come from other threads during a slew; a second concurrent slew is
//! refused.

pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod rt;
pub mod state;

pub use controller::{CancelToken, Controller, SlewOutcome};
pub use error::SlewError;
