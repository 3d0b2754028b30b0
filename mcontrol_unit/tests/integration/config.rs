//! Configuration files driving complete slews.

use std::io::Write;
use std::path::Path;

use mcontrol_common::angle::UserAngle;
use mcontrol_common::config::ConfigError;
use mcontrol_hal::SimulatedAxis;
use mcontrol_unit::config::{load_config, load_default_configuration};
use mcontrol_unit::{CancelToken, Controller, SlewError};
use tempfile::NamedTempFile;

const SAMPLE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/mcontrol.toml");

#[test]
fn sample_config_slews_simulated_axis() {
    let loaded = load_config(Path::new(SAMPLE_PATH)).unwrap();
    let axis = SimulatedAxis::new(loaded.simulation.clone(), loaded.angles.clone());
    let controller = Controller::new(
        loaded.controller.clone(),
        loaded.angles.clone(),
        axis.sensor(),
        axis.motor(),
        axis.clock(),
    )
    .unwrap();

    let outcome = controller
        .slew_user(UserAngle::new(100.0), &CancelToken::new())
        .unwrap();
    assert!(outcome.is_arrived());
    let user = controller.user_angle().unwrap();
    assert!((user - UserAngle::new(100.0)).abs() <= loaded.controller.tolerance);
}

#[test]
fn default_configuration_starts_parked() {
    let loaded = load_default_configuration().unwrap();
    let axis = SimulatedAxis::new(loaded.simulation.clone(), loaded.angles.clone());
    let controller = Controller::new(
        loaded.controller.clone(),
        loaded.angles.clone(),
        axis.sensor(),
        axis.motor(),
        axis.clock(),
    )
    .unwrap();

    let outcome = controller.park(&CancelToken::new()).unwrap();
    assert!(outcome.is_arrived());
    assert!(axis.commands().is_empty());

    // Only 315..335 is safe in the reference installation.
    let err = controller
        .slew_user(UserAngle::new(0.0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SlewError::UnsafeTarget { .. }));
}

#[test]
fn config_from_temp_file_overrides_tunables() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[motor]
min_duty = 20.0
max_duty = 60.0

[angles]
minimum_safe_angle = 350.0
maximum_safe_angle = 10.0

[movement]
park_position = 90.0
"#
    )
    .unwrap();
    let loaded = load_config(file.path()).unwrap();
    assert_eq!(loaded.controller.max_duty, 60.0);
    assert_eq!(loaded.controller.park_position.val(), 90.0);
}

#[test]
fn bad_linearization_is_load_time_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[angles]\nlinearization = [1.0]").unwrap();
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::Angle(_))
    ));
}
