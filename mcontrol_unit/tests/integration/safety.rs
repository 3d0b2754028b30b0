//! Forbidden arc enforcement and hardware faults.

use std::time::Duration;

use mcontrol_common::angle::CookedAngle;
use mcontrol_common::controller::ControllerConfig;
use mcontrol_common::hal::HalError;
use mcontrol_hal::{SimAxisConfig, SimulatedAxis};
use mcontrol_unit::{CancelToken, Controller, SlewError};

use super::{HookClock, angles, arc_angles, ends_stopped, rig, rig_with, sim, tuning};

#[test]
fn target_inside_arc_rejected_without_motor_commands() {
    let rig = rig(sim(90.0));
    let err = rig
        .controller
        .slew(CookedAngle::new(355.0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SlewError::UnsafeTarget { target } if target.val() == 355.0));
    assert!(err.is_rejection());
    assert!(rig.axis.commands().is_empty());
}

#[test]
fn wrapping_arc_rejects_targets_through_zero() {
    // Forbidden arc runs from 335 forward through 0 to 315.
    let rig = rig_with(sim(320.0), tuning(), arc_angles(335.0, 315.0));
    for target in [340.0, 0.0, 10.0, 300.0] {
        let err = rig
            .controller
            .slew(CookedAngle::new(target), &CancelToken::new())
            .unwrap_err();
        assert!(
            matches!(err, SlewError::UnsafeTarget { .. }),
            "{target}: {err:?}"
        );
    }
    assert!(rig.axis.commands().is_empty());

    let outcome = rig
        .controller
        .slew(CookedAngle::new(330.0), &CancelToken::new())
        .unwrap();
    assert!(outcome.is_arrived());
}

#[test]
fn start_inside_arc_rejected_without_motor_commands() {
    let rig = rig(sim(5.0));
    let err = rig
        .controller
        .slew(CookedAngle::new(90.0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SlewError::UnsafeStart { position } if (position - CookedAngle::new(5.0)).abs() < 1e-6));
    assert!(err.is_rejection());
    assert!(rig.axis.commands().is_empty());
}

#[test]
fn path_through_arc_rejected_without_motor_commands() {
    let rig = rig_with(sim(50.0), tuning(), arc_angles(100.0, 200.0));
    let err = rig
        .controller
        .slew(CookedAngle::new(250.0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SlewError::UnsafePath { .. }));
    assert!(rig.axis.commands().is_empty());
}

#[test]
fn drifting_into_arc_stops_motor() {
    // Reversed wiring with a long check period: the axis reaches the arc
    // before the monitor classifies the motion.
    let config = ControllerConfig {
        stall_check_period: Duration::from_secs(5),
        ..tuning()
    };
    let rig = rig_with(
        SimAxisConfig {
            reversed_wiring: true,
            ..sim(20.0)
        },
        config,
        angles(),
    );
    let err = rig
        .controller
        .slew(CookedAngle::new(60.0), &CancelToken::new())
        .unwrap_err();
    let SlewError::UnsafePosition { position } = err else {
        panic!("expected unsafe position, got {err:?}");
    };
    assert!(!rig.controller.angles().is_safe(position));
    assert!(ends_stopped(&rig.axis.commands()));
}

#[test]
fn sensor_fault_mid_slew_stops_motor() {
    let angles = angles();
    let axis = SimulatedAxis::new(sim(90.0), angles.clone());
    let faulty = axis.clone();
    let clock = HookClock::new(axis.clock(), move |n| {
        if n == 50 {
            faulty.set_sensor_fault(true);
        }
    });
    let controller =
        Controller::new(tuning(), angles, axis.sensor(), axis.motor(), clock).unwrap();

    let err = controller
        .slew(CookedAngle::new(150.0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(
        err,
        SlewError::Hardware(HalError::CommunicationError(_))
    ));
    assert!(ends_stopped(&axis.commands()));
    assert!(!controller.is_slewing());
}
