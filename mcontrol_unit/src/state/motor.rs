//! Motor health monitor.
//!
//! Classifies axis motion once per check period:
//!
//! ```text
//!            begin()
//!               │
//!               ▼
//!        ┌──────────────┐  period elapsed  ┌─────────────────────────┐
//!        │ Undetermined │ ───────────────▶ │ Ok / Stalled / WrongDir │
//!        └──────────────┘                  └─────────────────────────┘
//!               ▲                                     │
//!               └──── begin() (destall, reversal) ────┘
//! ```
//!
//! Displacement is measured in the commanded direction: more than
//! `threshold` forward is `Ok`, more than `threshold` backward is
//! `WrongDirection`, anything in between is `Stalled`.

use std::time::Duration;

use mcontrol_common::angle::{CookedAngle, Degrees};
use mcontrol_common::controller::MotorStatus;
use tracing::debug;

// ─── Monitor ────────────────────────────────────────────────────────

/// Per-slew stall monitor.
#[derive(Debug, Clone, Copy)]
pub struct MotorMonitor {
    period: Duration,
    threshold: Degrees,
    /// Angle at the start of the current period.
    sample: CookedAngle,
    /// Clock reading at the start of the current period.
    since: Duration,
    status: MotorStatus,
    /// Signed displacement along the commanded direction in the last
    /// completed period.
    last_displacement: Degrees,
}

impl MotorMonitor {
    /// Create an idle monitor. Call [`begin`](Self::begin) before the first
    /// [`check`](Self::check).
    pub const fn new(period: Duration, threshold: Degrees) -> Self {
        Self {
            period,
            threshold,
            sample: CookedAngle::new(0.0),
            since: Duration::ZERO,
            status: MotorStatus::Undetermined,
            last_displacement: 0.0,
        }
    }

    /// Restart monitoring from `angle` at time `now`.
    pub fn begin(&mut self, angle: CookedAngle, now: Duration) {
        self.sample = angle;
        self.since = now;
        self.status = MotorStatus::Undetermined;
        self.last_displacement = 0.0;
    }

    /// Classify motion if a full period has elapsed since the last sample,
    /// otherwise return the current status unchanged.
    ///
    /// `wanted_direction` is the sign of the commanded cooked motion.
    pub fn check(
        &mut self,
        angle: CookedAngle,
        now: Duration,
        wanted_direction: f64,
    ) -> MotorStatus {
        if now.saturating_sub(self.since) < self.period {
            return self.status;
        }

        let moved = (angle - self.sample) * wanted_direction.signum();
        self.status = if moved > self.threshold {
            MotorStatus::Ok
        } else if moved < -self.threshold {
            MotorStatus::WrongDirection
        } else {
            MotorStatus::Stalled
        };
        debug!(
            "Motor check: moved {:.3}° over {:?} -> {:?}",
            moved,
            now.saturating_sub(self.since),
            self.status
        );

        self.last_displacement = moved;
        self.sample = angle;
        self.since = now;
        self.status
    }

    /// Latest classification.
    #[inline]
    pub fn status(&self) -> MotorStatus {
        self.status
    }

    /// Displacement along the commanded direction in the last completed
    /// period [deg]. Negative for wrong-direction motion.
    #[inline]
    pub fn last_displacement(&self) -> Degrees {
        self.last_displacement
    }
}
