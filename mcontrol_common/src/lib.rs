//! mcontrol Common Library
//!
//! Shared types for the declination axis controller: the raw / cooked / user
//! angle model, the hardware boundary the controller talks to, controller
//! tunables and configuration loading utilities.
//!
//! # Module Structure
//!
//! - [`angle`] - Angle kinds, linearization and the forbidden-arc check
//! - [`hal`] - `Sensor`, `Motor` and `Clock` traits plus `HalError`
//! - [`controller`] - Controller tunables and motor status
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Defaults and parameter bounds
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use mcontrol_common::angle::{AngleConfig, RawAngle};
//!
//! let angles = AngleConfig::new(RawAngle::new(230.0));
//! let cooked = angles.cook(RawAngle::new(250.0));
//! assert!((cooked.val() - 20.0).abs() < 1e-9);
//! ```

pub mod angle;
pub mod config;
pub mod consts;
pub mod controller;
pub mod hal;
pub mod prelude;
