//! Nominal slews: arrival, taper, polarity and the operator scale.

use std::sync::Arc;
use std::time::Duration;

use mcontrol_common::angle::{AngleConfig, CookedAngle, RawAngle, UserAngle};
use mcontrol_common::controller::ControllerConfig;
use mcontrol_hal::SimAxisConfig;
use mcontrol_unit::{CancelToken, SlewError, SlewOutcome};

use super::{angles, duties, ends_stopped, rig, rig_with, sim, tuning};

#[test]
fn slew_forward_arrives_within_tolerance() {
    let rig = rig(sim(90.0));
    let outcome = rig
        .controller
        .slew(CookedAngle::new(150.0), &CancelToken::new())
        .unwrap();

    let SlewOutcome::Arrived { position } = outcome else {
        panic!("expected arrival, got {outcome:?}");
    };
    assert!((position - CookedAngle::new(150.0)).abs() <= 0.1);
    assert!((rig.axis.position() - CookedAngle::new(150.0)).abs() <= 0.1);

    let commands = rig.axis.commands();
    assert!(ends_stopped(&commands));
    for duty in duties(&commands) {
        assert!((15.0..=30.0).contains(&duty), "duty {duty} out of bounds");
    }
}

#[test]
fn slew_backward_uses_negative_duty() {
    let rig = rig(sim(200.0));
    let outcome = rig
        .controller
        .slew(CookedAngle::new(120.0), &CancelToken::new())
        .unwrap();
    assert!(outcome.is_arrived());
    assert!(duties(&rig.axis.commands()).iter().all(|d| *d < 0.0));
}

#[test]
fn already_at_target_issues_no_motor_commands() {
    let rig = rig(sim(90.0));
    let outcome = rig
        .controller
        .slew(CookedAngle::new(90.05), &CancelToken::new())
        .unwrap();
    assert!(outcome.is_arrived());
    assert!(rig.axis.commands().is_empty());
}

#[test]
fn duty_tapers_toward_min_near_target() {
    let rig = rig(sim(90.0));
    rig.controller
        .slew(CookedAngle::new(150.0), &CancelToken::new())
        .unwrap();

    let duties = duties(&rig.axis.commands());
    assert_eq!(duties.first().copied(), Some(30.0));
    assert_eq!(duties.last().copied(), Some(15.0));
    // Monotonically non-increasing on a straight approach.
    assert!(duties.windows(2).all(|w| w[1] <= w[0] + 1e-12));
}

#[test]
fn inverted_polarity_compensates_reversed_wiring() {
    let config = ControllerConfig {
        invert_motor_polarity: true,
        ..tuning()
    };
    let rig = rig_with(
        SimAxisConfig {
            reversed_wiring: true,
            ..sim(90.0)
        },
        config,
        angles(),
    );
    let outcome = rig
        .controller
        .slew(CookedAngle::new(130.0), &CancelToken::new())
        .unwrap();
    assert!(outcome.is_arrived());
    // Forward cooked motion is commanded with negative duty.
    assert!(duties(&rig.axis.commands()).iter().all(|d| *d < 0.0));
}

#[test]
fn slew_user_applies_user_origin() {
    let rig = rig(sim(90.0));
    let outcome = rig
        .controller
        .slew_user(UserAngle::new(100.0), &CancelToken::new())
        .unwrap();
    assert!((outcome.position() - CookedAngle::new(120.0)).abs() <= 0.1);
    let user = rig.controller.user_angle().unwrap();
    assert!((user - UserAngle::new(100.0)).abs() <= 0.1);
}

#[test]
fn park_slews_to_park_position() {
    let rig = rig(sim(250.0));
    let outcome = rig.controller.park(&CancelToken::new()).unwrap();
    assert!((outcome.position() - CookedAngle::new(180.0)).abs() <= 0.1);
}

#[test]
fn arrives_with_linearized_sensor() {
    let angles = Arc::new(
        AngleConfig::new(RawAngle::new(230.0))
            .with_linearization(&[1.5, -0.8, 0.3, 0.2])
            .unwrap()
            .with_safe_limits(CookedAngle::new(350.0), CookedAngle::new(10.0))
            .unwrap(),
    );
    let rig = rig_with(sim(40.0), tuning(), angles);
    let outcome = rig
        .controller
        .slew(CookedAngle::new(75.0), &CancelToken::new())
        .unwrap();
    assert!(outcome.is_arrived());
    assert!((rig.axis.position() - CookedAngle::new(75.0)).abs() <= 0.1 + 1e-6);
}

#[test]
fn consecutive_slews_reuse_controller() {
    let rig = rig(sim(90.0));
    let cancel = CancelToken::new();
    rig.controller.slew(CookedAngle::new(110.0), &cancel).unwrap();
    rig.controller.slew(CookedAngle::new(60.0), &cancel).unwrap();
    assert!((rig.axis.position() - CookedAngle::new(60.0)).abs() <= 0.1);
    assert!(!rig.controller.is_slewing());
}

#[test]
fn overshooting_every_loop_fails_as_hunting() {
    // 15% of 20°/s for 100 ms moves 0.3°, more than twice the tolerance.
    let config = ControllerConfig {
        loop_delay: Duration::from_millis(100),
        max_reversals: 5,
        ..tuning()
    };
    let rig = rig_with(sim(90.0), config, angles());
    let err = rig
        .controller
        .slew(CookedAngle::new(90.45), &CancelToken::new())
        .unwrap_err();

    let SlewError::Hunting { position, reversals } = err else {
        panic!("expected hunting, got {err:?}");
    };
    assert_eq!(reversals, 6);
    assert!((position - CookedAngle::new(90.45)).abs() < 0.2);
    assert!(!err.is_rejection());
    assert!(ends_stopped(&rig.axis.commands()));
    assert!(rig.axis.elapsed() < Duration::from_secs(5));
    assert!(!rig.controller.is_slewing());
}
