//! Defaults and parameter bounds for the declination axis.
//!
//! Single source of truth for numeric limits. The defaults reproduce the
//! reference mount installation; every value can be overridden from the
//! configuration file.

/// Maximum number of linearization harmonics (coefficient pairs).
pub const MAX_HARMONICS: usize = 8;

/// Maximum number of flat linearization coefficients (`2 * MAX_HARMONICS`).
pub const MAX_LINEARIZATION_COEFFS: usize = 2 * MAX_HARMONICS;

/// Iterations used when inverting the linearization.
pub const UNCOOK_ITERATIONS: usize = 32;

// ─── Motor ──────────────────────────────────────────────────────────

/// Lowest duty the motor still turns at [%].
pub const MIN_DUTY_DEFAULT: f64 = 15.0;
/// Highest duty commanded during a slew [%].
pub const MAX_DUTY_DEFAULT: f64 = 30.0;
/// Absolute duty bounds [%].
pub const DUTY_MIN: f64 = 0.0;
pub const DUTY_MAX: f64 = 100.0;

/// Stall check period [ms].
pub const STALL_CHECK_PERIOD_MS_DEFAULT: u64 = 1000;
/// Minimum displacement per stall check period [deg].
pub const STALL_THRESHOLD_DEFAULT: f64 = 0.0;
/// Reverse duty of the destall pulse [%].
pub const DESTALL_DUTY_DEFAULT: f64 = 0.0;
/// Destall pulse length [ms].
pub const DESTALL_DURATION_MS_DEFAULT: u64 = 0;
/// Destall pulses allowed per slew before the stall becomes fatal.
pub const MAX_DESTALL_ATTEMPTS_DEFAULT: u32 = 3;
pub const MAX_DESTALL_ATTEMPTS_MAX: u32 = 100;

// ─── Movement ───────────────────────────────────────────────────────

/// Park position [cooked deg]. Inside the default safe window.
pub const PARK_POSITION_DEFAULT: f64 = 325.0;
/// Distance over which the duty tapers down before the target [deg].
pub const ACCEL_ANGLE_DEFAULT: f64 = 20.0;
/// Arrival tolerance [deg].
pub const TOLERANCE_DEFAULT: f64 = 0.1;
pub const TOLERANCE_MAX: f64 = 10.0;
/// Direction reversals allowed per slew before it counts as hunting.
pub const MAX_REVERSALS_DEFAULT: u32 = 20;
pub const MAX_REVERSALS_MAX: u32 = 1000;

// ─── Control loop ───────────────────────────────────────────────────

/// Control loop period [ms].
pub const LOOP_DELAY_MS_DEFAULT: u64 = 10;
pub const LOOP_DELAY_MS_MIN: u64 = 1;
pub const LOOP_DELAY_MS_MAX: u64 = 1000;

// ─── Angle model ────────────────────────────────────────────────────

/// Raw sensor reading that becomes cooked zero [raw deg].
pub const HARDWARE_ORIGIN_DEFAULT: f64 = 250.0 - 20.0;
/// Cooked angle shown to the operator as zero [cooked deg].
pub const USER_ORIGIN_DEFAULT: f64 = 20.0;
/// Start of the forbidden arc [cooked deg].
pub const MINIMUM_SAFE_ANGLE_DEFAULT: f64 = 335.0;
/// End of the forbidden arc [cooked deg].
pub const MAXIMUM_SAFE_ANGLE_DEFAULT: f64 = 315.0;
