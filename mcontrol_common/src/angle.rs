//! Raw, cooked and user angles.
//!
//! - **Raw** angles come straight from the sensor, in `[0, 360)`. Sensor
//!   nonlinearity makes arithmetic between them meaningless, so a
//!   [`RawAngle`] only supports wrapping offset addition.
//! - **Cooked** angles are linearized, origin-shifted and possibly inverted
//!   raw angles, still in `[0, 360)`. The origin sits in a region the
//!   hardware never reaches, so cooked values do not wrap through the
//!   `0/360` seam while the axis moves. The controller does all of its math
//!   in cooked angles.
//! - **User** angles are cooked angles shifted by a configurable origin,
//!   in `[-origin, 360 - origin)`. They exist for operator input and output
//!   only.
//!
//! [`CookedAngle`] and [`UserAngle`] are both [`Angle<K>`] with a different
//! kind tag. All comparison and offset arithmetic is written once on
//! `Angle<K>`, and an expression mixing two kinds does not compile.
//!
//! Conversions need the per-axis [`AngleConfig`], which is built once at
//! startup and shared read-only afterwards.

mod config;
mod linearization;
mod types;

pub use config::{AngleConfig, AngleConfigError};
pub use linearization::Linearization;
pub use types::{Angle, AngleKind, Cooked, CookedAngle, RawAngle, User, UserAngle};

/// Angle value in degrees.
pub type Degrees = f64;

/// Map any finite angle into `[0, 360)`.
///
/// Handles negative inputs and exact multiples of 360. Tiny negative inputs
/// whose remainder rounds up to 360 map to 0.
#[inline]
pub fn mod360(value: Degrees) -> Degrees {
    let r = value.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Whether `angle` lies on the arc traveled from `start` forward
/// (increasing, wrapping through `0/360`) to `end`, both ends included.
#[inline]
pub fn on_arc(angle: Degrees, start: Degrees, end: Degrees) -> bool {
    mod360(angle - start) <= mod360(end - start)
}
