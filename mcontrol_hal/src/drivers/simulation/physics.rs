//! Axis physics model.
//!
//! First-order kinematics: axis speed is proportional to the applied duty,
//! with static friction below the breakaway duty and an optional wall that
//! blocks travel in one direction.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, trace};

use super::config::{Obstruction, SimAxisConfig};

/// Integration step.
const STEP: Duration = Duration::from_millis(1);

/// Motor command as received by the simulated motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorCommand {
    /// Signed duty command [%].
    Duty {
        /// Simulation time of the command.
        at: Duration,
        /// Commanded duty.
        duty: f64,
    },
    /// Stop command.
    Stop {
        /// Simulation time of the command.
        at: Duration,
    },
}

impl MotorCommand {
    /// Commanded duty, zero for `Stop`.
    pub fn duty(&self) -> f64 {
        match self {
            Self::Duty { duty, .. } => *duty,
            Self::Stop { .. } => 0.0,
        }
    }
}

/// Shared state behind the simulation handles.
#[derive(Debug)]
pub(crate) struct AxisPhysics {
    config: SimAxisConfig,
    /// Cooked position, continuous (not normalized).
    pub(crate) position: f64,
    /// Duty currently applied [%].
    duty: f64,
    /// Simulation time.
    pub(crate) time: Duration,
    /// Sign of the last non-zero duty.
    last_direction: f64,
    reversals: u32,
    obstruction: Option<Obstruction>,
    /// Bounded to `config.command_log_capacity`, oldest dropped first.
    pub(crate) commands: VecDeque<MotorCommand>,
    pub(crate) sensor_fault: bool,
}

impl AxisPhysics {
    pub(crate) fn new(config: SimAxisConfig) -> Self {
        Self {
            position: config.start_position,
            obstruction: config.obstruction,
            config,
            duty: 0.0,
            time: Duration::ZERO,
            last_direction: 0.0,
            reversals: 0,
            commands: VecDeque::new(),
            sensor_fault: false,
        }
    }

    pub(crate) fn apply_duty(&mut self, duty: f64) {
        self.record(MotorCommand::Duty {
            at: self.time,
            duty,
        });
        if duty != 0.0 {
            let direction = duty.signum();
            if self.last_direction != 0.0 && direction != self.last_direction {
                self.reversals += 1;
                self.check_obstruction_clears();
            }
            self.last_direction = direction;
        }
        self.duty = duty;
    }

    pub(crate) fn stop(&mut self) {
        self.record(MotorCommand::Stop { at: self.time });
        self.duty = 0.0;
    }

    fn record(&mut self, command: MotorCommand) {
        let capacity = self.config.command_log_capacity;
        if capacity == 0 {
            return;
        }
        while self.commands.len() >= capacity {
            self.commands.pop_front();
        }
        self.commands.push_back(command);
    }

    pub(crate) fn reversals(&self) -> u32 {
        self.reversals
    }

    fn check_obstruction_clears(&mut self) {
        if let Some(Obstruction {
            clears_after_reversals: Some(limit),
            ..
        }) = self.obstruction
        {
            if self.reversals >= limit {
                debug!(
                    "Simulated obstruction cleared after {} reversals",
                    self.reversals
                );
                self.obstruction = None;
            }
        }
    }

    /// Axis velocity for the applied duty [deg/s].
    fn velocity(&self) -> f64 {
        if self.duty.abs() < self.config.breakaway_duty || self.duty == 0.0 {
            return 0.0;
        }
        let wired = if self.config.reversed_wiring {
            -self.duty
        } else {
            self.duty
        };
        wired / 100.0 * self.config.speed_at_full_duty
    }

    /// Advance the model by `dt`.
    pub(crate) fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;
        while !remaining.is_zero() {
            let step = remaining.min(STEP);
            remaining -= step;
            self.time += step;

            let from = self.position;
            let mut to = from + self.velocity() * step.as_secs_f64();

            if let Some(wall) = self.obstruction {
                if wall.direction > 0.0 && from <= wall.at && to > wall.at {
                    to = wall.at;
                } else if wall.direction < 0.0 && from >= wall.at && to < wall.at {
                    to = wall.at;
                }
            }
            self.position = to;
        }
        trace!(
            "Sim axis: t={:?}, pos={:.4}, duty={:.1}",
            self.time, self.position, self.duty
        );
    }
}
