//! Slew failure modes.
//!
//! Stalls are absorbed by the destall retry inside the slew loop; a
//! `SlewError::Stalled` only surfaces once the retry budget is spent.
//! Everything else aborts the slew at the first occurrence.

use mcontrol_common::angle::{CookedAngle, Degrees};
use mcontrol_common::hal::HalError;
use thiserror::Error;

/// Why a slew did not reach its target.
#[derive(Debug, Clone, Error)]
pub enum SlewError {
    /// Another slew is running on this controller.
    #[error("slew already in progress")]
    AlreadySlewing,

    /// Target lies inside the forbidden arc.
    #[error("target {target} is inside the forbidden arc")]
    UnsafeTarget { target: CookedAngle },

    /// Axis was already inside the forbidden arc when the slew was requested.
    #[error("axis starts at {position}, inside the forbidden arc")]
    UnsafeStart { position: CookedAngle },

    /// Axis moved into the forbidden arc during the slew.
    #[error("axis position {position} is inside the forbidden arc")]
    UnsafePosition { position: CookedAngle },

    /// Straight path from the current position crosses the forbidden arc.
    #[error("path {from} -> {to} crosses the forbidden arc")]
    UnsafePath { from: CookedAngle, to: CookedAngle },

    /// Motor stayed stalled after every allowed destall pulse.
    #[error("motor stalled at {position} after {attempts} destall attempts")]
    Stalled { position: CookedAngle, attempts: u32 },

    /// Axis moved against the commanded direction.
    #[error("axis moved {displacement:.3}° against the commanded direction at {position}")]
    WrongDirection {
        position: CookedAngle,
        displacement: Degrees,
    },

    /// Axis kept overshooting the target.
    #[error("axis hunting around {position}: {reversals} direction reversals")]
    Hunting {
        position: CookedAngle,
        reversals: u32,
    },

    /// Sensor or motor failure.
    #[error(transparent)]
    Hardware(#[from] HalError),
}

impl SlewError {
    /// Whether a pre-check refused the slew. The motor was not driven.
    ///
    /// `false` does not imply motion: a `Hardware` error may come from the
    /// first position read.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::AlreadySlewing
                | Self::UnsafeTarget { .. }
                | Self::UnsafeStart { .. }
                | Self::UnsafePath { .. }
        )
    }
}
