//! Stall detection, destall pulses and wrong-direction faults.

use std::time::Duration;

use mcontrol_common::angle::CookedAngle;
use mcontrol_common::controller::ControllerConfig;
use mcontrol_hal::{MotorCommand, Obstruction, SimAxisConfig};
use mcontrol_unit::{CancelToken, SlewError};

use super::{angles, duties, ends_stopped, rig, rig_with, sim, tuning};

fn blocked_at(at: f64, clears_after_reversals: Option<u32>) -> SimAxisConfig {
    SimAxisConfig {
        obstruction: Some(Obstruction {
            at,
            direction: 1.0,
            clears_after_reversals,
        }),
        ..sim(90.0)
    }
}

fn destall_pulses(commands: &[MotorCommand]) -> usize {
    duties(commands).iter().filter(|d| **d == -40.0).count()
}

#[test]
fn stall_issues_reverse_pulse_before_retry() {
    let rig = rig(blocked_at(100.0, Some(1)));
    let outcome = rig
        .controller
        .slew(CookedAngle::new(150.0), &CancelToken::new())
        .unwrap();
    assert!(outcome.is_arrived());

    let commands = rig.axis.commands();
    let pulse = commands
        .iter()
        .position(|c| matches!(c, MotorCommand::Duty { duty, .. } if *duty == -40.0))
        .expect("destall pulse");
    let MotorCommand::Duty { at: pulse_at, .. } = commands[pulse] else {
        unreachable!();
    };

    // Forward drive resumes once the pulse has run for its full duration.
    let MotorCommand::Duty { at, duty } = commands[pulse + 1] else {
        panic!("expected forward duty after the pulse");
    };
    assert!(duty > 0.0);
    assert_eq!(at - pulse_at, Duration::from_millis(300));
    assert_eq!(destall_pulses(&commands), 1);
}

#[test]
fn stall_is_fatal_after_retry_cap() {
    let rig = rig(blocked_at(100.0, None));
    let err = rig
        .controller
        .slew(CookedAngle::new(150.0), &CancelToken::new())
        .unwrap_err();

    let SlewError::Stalled { position, attempts } = err else {
        panic!("expected stall, got {err:?}");
    };
    assert_eq!(attempts, 3);
    assert!((position - CookedAngle::new(100.0)).abs() < 1e-6);

    let commands = rig.axis.commands();
    assert_eq!(destall_pulses(&commands), 3);
    assert!(ends_stopped(&commands));
}

#[test]
fn zero_retry_cap_fails_on_first_stall() {
    let config = ControllerConfig {
        max_destall_attempts: 0,
        ..tuning()
    };
    let rig = rig_with(blocked_at(100.0, None), config, angles());
    let err = rig
        .controller
        .slew(CookedAngle::new(150.0), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, SlewError::Stalled { attempts: 0, .. }));
    assert_eq!(destall_pulses(&rig.axis.commands()), 0);
}

#[test]
fn min_duty_below_breakaway_stalls_short_of_target() {
    let rig = rig(SimAxisConfig {
        breakaway_duty: 20.0,
        ..sim(90.0)
    });
    let err = rig
        .controller
        .slew(CookedAngle::new(150.0), &CancelToken::new())
        .unwrap_err();
    let SlewError::Stalled { position, .. } = err else {
        panic!("expected stall, got {err:?}");
    };
    // Taper drops below 20% duty inside ~13° of the target.
    assert!(position < CookedAngle::new(140.0), "stopped at {position}");
    assert!(ends_stopped(&rig.axis.commands()));
}

#[test]
fn wrong_direction_is_fatal_without_retry() {
    let rig = rig(SimAxisConfig {
        reversed_wiring: true,
        ..sim(90.0)
    });
    let err = rig
        .controller
        .slew(CookedAngle::new(150.0), &CancelToken::new())
        .unwrap_err();

    let SlewError::WrongDirection {
        position,
        displacement,
    } = err
    else {
        panic!("expected wrong direction, got {err:?}");
    };
    assert!(displacement < -0.2);
    assert!(position < CookedAngle::new(90.0));

    let commands = rig.axis.commands();
    assert_eq!(destall_pulses(&commands), 0);
    assert!(ends_stopped(&commands));
}
