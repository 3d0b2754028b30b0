//! TOML configuration loader with validation.
//!
//! One file describes one axis: motor tunables, movement, loop cadence, the
//! angle model and the optional simulation parameters. Loading parses the
//! file, checks parameter bounds and builds the runtime values
//! (`ControllerConfig`, `AngleConfig`).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use mcontrol_common::angle::{AngleConfig, CookedAngle, RawAngle};
use mcontrol_common::config::{ConfigError, ConfigLoader, SharedConfig};
use mcontrol_common::consts::{
    ACCEL_ANGLE_DEFAULT, DESTALL_DURATION_MS_DEFAULT, DESTALL_DUTY_DEFAULT,
    HARDWARE_ORIGIN_DEFAULT, LOOP_DELAY_MS_DEFAULT, MAX_DESTALL_ATTEMPTS_DEFAULT,
    MAX_DUTY_DEFAULT, MAX_REVERSALS_DEFAULT, MAXIMUM_SAFE_ANGLE_DEFAULT, MIN_DUTY_DEFAULT, MINIMUM_SAFE_ANGLE_DEFAULT,
    PARK_POSITION_DEFAULT, STALL_CHECK_PERIOD_MS_DEFAULT, STALL_THRESHOLD_DEFAULT,
    TOLERANCE_DEFAULT, USER_ORIGIN_DEFAULT,
};
use mcontrol_common::controller::ControllerConfig;
use mcontrol_hal::SimAxisConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ─── File Schema ────────────────────────────────────────────────────

/// `[motor]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotorSection {
    pub min_duty: f64,
    pub max_duty: f64,
    pub invert_polarity: bool,
    pub stall_check_period_ms: u64,
    pub stall_threshold: f64,
    pub destall_duty: f64,
    pub destall_duration_ms: u64,
    pub max_destall_attempts: u32,
}

impl Default for MotorSection {
    fn default() -> Self {
        Self {
            min_duty: MIN_DUTY_DEFAULT,
            max_duty: MAX_DUTY_DEFAULT,
            invert_polarity: false,
            stall_check_period_ms: STALL_CHECK_PERIOD_MS_DEFAULT,
            stall_threshold: STALL_THRESHOLD_DEFAULT,
            destall_duty: DESTALL_DUTY_DEFAULT,
            destall_duration_ms: DESTALL_DURATION_MS_DEFAULT,
            max_destall_attempts: MAX_DESTALL_ATTEMPTS_DEFAULT,
        }
    }
}

/// `[movement]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementSection {
    /// [cooked deg]
    pub park_position: f64,
    pub accel_angle: f64,
    pub tolerance: f64,
    pub max_reversals: u32,
}

impl Default for MovementSection {
    fn default() -> Self {
        Self {
            park_position: PARK_POSITION_DEFAULT,
            accel_angle: ACCEL_ANGLE_DEFAULT,
            tolerance: TOLERANCE_DEFAULT,
            max_reversals: MAX_REVERSALS_DEFAULT,
        }
    }
}

/// `[control_loop]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlLoopSection {
    pub loop_delay_ms: u64,
}

impl Default for ControlLoopSection {
    fn default() -> Self {
        Self {
            loop_delay_ms: LOOP_DELAY_MS_DEFAULT,
        }
    }
}

/// `[angles]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnglesSection {
    /// Raw reading at cooked zero [raw deg].
    pub hardware_origin: f64,
    pub inverted: bool,
    /// Operator zero [cooked deg].
    pub user_origin: f64,
    /// Flat `[cos1, sin1, cos2, sin2, ...]` list.
    pub linearization: Vec<f64>,
    pub minimum_safe_angle: f64,
    pub maximum_safe_angle: f64,
}

impl Default for AnglesSection {
    fn default() -> Self {
        Self {
            hardware_origin: HARDWARE_ORIGIN_DEFAULT,
            inverted: false,
            user_origin: USER_ORIGIN_DEFAULT,
            linearization: Vec::new(),
            minimum_safe_angle: MINIMUM_SAFE_ANGLE_DEFAULT,
            maximum_safe_angle: MAXIMUM_SAFE_ANGLE_DEFAULT,
        }
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub shared: SharedConfig,
    pub motor: MotorSection,
    pub movement: MovementSection,
    pub control_loop: ControlLoopSection,
    pub angles: AnglesSection,
    pub simulation: SimAxisConfig,
}

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Validated configuration, ready for runtime use.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub shared: SharedConfig,
    pub controller: ControllerConfig,
    pub angles: Arc<AngleConfig>,
    pub simulation: SimAxisConfig,
}

fn check_origin(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..360.0).contains(&value) {
        return Err(ConfigError::ValidationError(format!(
            "{field} {value} out of range [0, 360)"
        )));
    }
    Ok(())
}

impl ConfigFile {
    /// Validate and convert to runtime values.
    pub fn into_loaded(self) -> Result<LoadedConfig, ConfigError> {
        self.shared.validate()?;

        let a = &self.angles;
        check_origin("hardware_origin", a.hardware_origin)?;
        check_origin("user_origin", a.user_origin)?;
        let angles = AngleConfig::new(RawAngle::new(a.hardware_origin))
            .with_inverted(a.inverted)
            .with_user_origin(CookedAngle::new(a.user_origin))?
            .with_linearization(&a.linearization)?
            .with_safe_limits(
                CookedAngle::new(a.minimum_safe_angle),
                CookedAngle::new(a.maximum_safe_angle),
            )?;

        let m = &self.motor;
        let controller = ControllerConfig {
            min_duty: m.min_duty,
            max_duty: m.max_duty,
            invert_motor_polarity: m.invert_polarity,
            stall_check_period: Duration::from_millis(m.stall_check_period_ms),
            stall_threshold: m.stall_threshold,
            destall_duty: m.destall_duty,
            destall_duration: Duration::from_millis(m.destall_duration_ms),
            max_destall_attempts: m.max_destall_attempts,
            park_position: CookedAngle::new(self.movement.park_position),
            accel_angle: self.movement.accel_angle,
            tolerance: self.movement.tolerance,
            max_reversals: self.movement.max_reversals,
            loop_delay: Duration::from_millis(self.control_loop.loop_delay_ms),
        };
        controller.validate().map_err(ConfigError::ValidationError)?;

        if !angles.is_safe(controller.park_position) {
            return Err(ConfigError::ValidationError(format!(
                "park_position {} is inside the forbidden arc [{}, {}]",
                self.movement.park_position, a.minimum_safe_angle, a.maximum_safe_angle
            )));
        }

        let sim = &self.simulation;
        if !sim.speed_at_full_duty.is_finite() || sim.speed_at_full_duty <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "simulation.speed_at_full_duty {} must be positive",
                sim.speed_at_full_duty
            )));
        }

        debug!(
            "Config OK: {} harmonics, forbidden arc [{}, {}], park {}",
            angles.linearization().harmonics(),
            angles.minimum(),
            angles.maximum(),
            controller.park_position
        );

        Ok(LoadedConfig {
            shared: self.shared,
            controller,
            angles: Arc::new(angles),
            simulation: self.simulation,
        })
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    debug!("Loading config from {}", path.display());
    ConfigFile::load(path)?.into_loaded()
}

/// Load and validate configuration from TOML text.
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    ConfigFile::load_str(content)?.into_loaded()
}

/// Built-in defaults for the reference installation.
pub fn load_default_configuration() -> Result<LoadedConfig, ConfigError> {
    ConfigFile::default().into_loaded()
}
