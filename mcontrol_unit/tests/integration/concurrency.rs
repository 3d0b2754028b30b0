//! Cancellation and concurrent access during a slew.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use mcontrol_common::angle::CookedAngle;
use mcontrol_common::hal::Clock;
use mcontrol_hal::{SimClock, SimulatedAxis};
use mcontrol_unit::{CancelToken, Controller, SlewError, SlewOutcome};
use parking_lot::Mutex;

use super::{HookClock, angles, ends_stopped, rig, sim, tuning};

/// Simulation clock whose first sleep blocks until released.
struct GateClock {
    inner: SimClock,
    gate: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

impl Clock for GateClock {
    fn now(&self) -> Duration {
        self.inner.now()
    }

    fn sleep(&self, duration: Duration) {
        let gate = self.gate.lock().take();
        if let Some((entered, release)) = gate {
            let _ = entered.send(());
            let _ = release.recv();
        }
        self.inner.sleep(duration);
    }
}

#[test]
fn cancelled_token_stops_before_any_command() {
    let rig = rig(sim(90.0));
    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = rig
        .controller
        .slew(CookedAngle::new(150.0), &cancel)
        .unwrap();
    assert!(matches!(outcome, SlewOutcome::Cancelled { .. }));
    assert!(rig.axis.commands().is_empty());
}

#[test]
fn cancel_mid_slew_stops_motor() {
    let angles = angles();
    let axis = SimulatedAxis::new(sim(90.0), angles.clone());
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let clock = HookClock::new(axis.clock(), move |n| {
        if n == 100 {
            trigger.cancel();
        }
    });
    let controller =
        Controller::new(tuning(), angles, axis.sensor(), axis.motor(), clock).unwrap();

    let outcome = controller.slew(CookedAngle::new(150.0), &cancel).unwrap();
    let SlewOutcome::Cancelled { position } = outcome else {
        panic!("expected cancellation, got {outcome:?}");
    };
    assert!(position > CookedAngle::new(90.0) && position < CookedAngle::new(150.0));
    assert!(ends_stopped(&axis.commands()));

    // A re-armed token allows the next slew.
    cancel.reset();
    let outcome = controller.slew(CookedAngle::new(150.0), &cancel).unwrap();
    assert!(outcome.is_arrived());
}

#[test]
fn concurrent_slew_rejected_while_reads_continue() {
    let angles = angles();
    let axis = SimulatedAxis::new(sim(90.0), angles.clone());
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let clock = GateClock {
        inner: axis.clock(),
        gate: Mutex::new(Some((entered_tx, release_rx))),
    };
    let controller =
        Controller::new(tuning(), angles, axis.sensor(), axis.motor(), clock).unwrap();
    let cancel = CancelToken::new();

    thread::scope(|s| {
        let first = s.spawn(|| controller.slew(CookedAngle::new(150.0), &cancel));
        entered_rx.recv().unwrap();

        assert!(controller.is_slewing());
        let second = controller.slew(CookedAngle::new(120.0), &CancelToken::new());
        assert!(matches!(second, Err(SlewError::AlreadySlewing)));
        assert!(controller.cooked_angle().is_ok());

        release_tx.send(()).unwrap();
        let outcome = first.join().unwrap().unwrap();
        assert!(outcome.is_arrived());
    });

    assert!(!controller.is_slewing());
    let outcome = controller
        .slew(CookedAngle::new(120.0), &CancelToken::new())
        .unwrap();
    assert!(outcome.is_arrived());
}
