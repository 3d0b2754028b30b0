//! Per-axis angle configuration and the conversions that depend on it.

use thiserror::Error;

use super::linearization::Linearization;
use super::types::{CookedAngle, RawAngle, UserAngle};
use super::{Degrees, mod360, on_arc};
use crate::consts::{
    HARDWARE_ORIGIN_DEFAULT, MAXIMUM_SAFE_ANGLE_DEFAULT, MINIMUM_SAFE_ANGLE_DEFAULT,
    USER_ORIGIN_DEFAULT,
};

/// Invalid angle configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AngleConfigError {
    /// Linearization coefficients must come in `[cos, sin]` pairs.
    #[error("linearization needs coefficient pairs, got {0} values")]
    OddCoefficientCount(usize),

    /// More harmonic orders than the fixed capacity.
    #[error("linearization has {count} harmonics, at most {max} supported")]
    TooManyHarmonics { count: usize, max: usize },

    /// NaN or infinite input.
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

fn finite(field: &'static str, value: f64) -> Result<f64, AngleConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AngleConfigError::NonFinite { field, value })
    }
}

/// Angle configuration of one axis.
///
/// Built once during startup, then shared read-only with the controller.
/// Holds the hardware origin, the inversion flag, the user origin, the
/// linearization and the forbidden arc `[minimum, maximum]`.
#[derive(Debug, Clone)]
pub struct AngleConfig {
    hardware_origin: RawAngle,
    inverted: bool,
    user_origin: CookedAngle,
    linearization: Linearization,
    minimum_safe: CookedAngle,
    maximum_safe: CookedAngle,
}

impl AngleConfig {
    /// Configuration with the given hardware origin, no linearization, no
    /// inversion and the user origin at cooked zero. The forbidden arc
    /// collapses to the single point `0`; set it with
    /// [`with_safe_limits`](Self::with_safe_limits).
    pub fn new(hardware_origin: RawAngle) -> Self {
        Self {
            hardware_origin,
            inverted: false,
            user_origin: CookedAngle::new(0.0),
            linearization: Linearization::identity(),
            minimum_safe: CookedAngle::new(0.0),
            maximum_safe: CookedAngle::new(0.0),
        }
    }

    /// Set the linearization from a flat coefficient list.
    pub fn with_linearization(mut self, coefficients: &[f64]) -> Result<Self, AngleConfigError> {
        self.linearization = Linearization::from_coefficients(coefficients)?;
        Ok(self)
    }

    /// Invert the sense of cooked angles with respect to raw angles.
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Place the user scale zero at `origin`.
    pub fn with_user_origin(mut self, origin: CookedAngle) -> Result<Self, AngleConfigError> {
        self.user_origin = CookedAngle::new(mod360(finite("user_origin", origin.val())?));
        Ok(self)
    }

    /// Set the forbidden arc, traveled from `minimum` forward to `maximum`.
    pub fn with_safe_limits(
        mut self,
        minimum: CookedAngle,
        maximum: CookedAngle,
    ) -> Result<Self, AngleConfigError> {
        self.minimum_safe = CookedAngle::new(mod360(finite("minimum_safe_angle", minimum.val())?));
        self.maximum_safe = CookedAngle::new(mod360(finite("maximum_safe_angle", maximum.val())?));
        Ok(self)
    }

    #[inline]
    pub fn hardware_origin(&self) -> RawAngle {
        self.hardware_origin
    }

    #[inline]
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    #[inline]
    pub fn user_origin(&self) -> CookedAngle {
        self.user_origin
    }

    #[inline]
    pub fn linearization(&self) -> &Linearization {
        &self.linearization
    }

    /// Start of the forbidden arc.
    #[inline]
    pub fn minimum(&self) -> CookedAngle {
        self.minimum_safe
    }

    /// End of the forbidden arc.
    #[inline]
    pub fn maximum(&self) -> CookedAngle {
        self.maximum_safe
    }

    // ─── Conversions ────────────────────────────────────────────────

    /// Raw → cooked: linearize, subtract the hardware origin, optionally
    /// invert, normalize.
    pub fn cook(&self, raw: RawAngle) -> CookedAngle {
        let shifted = self.linearization.linearize(raw.val()) - self.hardware_origin.val();
        let signed = if self.inverted { -shifted } else { shifted };
        CookedAngle::new(mod360(signed))
    }

    /// Cooked → raw, the inverse of [`cook`](Self::cook).
    pub fn uncook(&self, cooked: CookedAngle) -> RawAngle {
        let shifted = if self.inverted {
            -cooked.val()
        } else {
            cooked.val()
        };
        let linearized = shifted + self.hardware_origin.val();
        RawAngle::new(self.linearization.delinearize(mod360(linearized)))
    }

    /// Cooked → user, in `[-origin, 360 - origin)`.
    pub fn to_user(&self, cooked: CookedAngle) -> UserAngle {
        let origin = self.user_origin.val();
        let val = mod360(cooked.val() - origin);
        if val >= 360.0 - origin {
            UserAngle::new(val - 360.0)
        } else {
            UserAngle::new(val)
        }
    }

    /// User → cooked.
    pub fn from_user(&self, user: UserAngle) -> CookedAngle {
        CookedAngle::new(mod360(user.val() + self.user_origin.val()))
    }

    // ─── Safety ─────────────────────────────────────────────────────

    /// Whether `angle` lies outside the forbidden arc.
    #[inline]
    pub fn is_safe(&self, angle: CookedAngle) -> bool {
        !on_arc(
            mod360(angle.val()),
            self.minimum_safe.val(),
            self.maximum_safe.val(),
        )
    }

    /// Whether the straight cooked-frame path between two safe angles stays
    /// clear of the forbidden arc.
    ///
    /// Cooked angles do not wrap while the axis moves, so the path is the
    /// numeric interval between `from` and `to`. With both ends safe, the
    /// path enters the arc exactly when it contains the arc's start.
    pub fn path_is_safe(&self, from: CookedAngle, to: CookedAngle) -> bool {
        if !self.is_safe(from) || !self.is_safe(to) {
            return false;
        }
        let (lo, hi) = if from <= to {
            (from.val(), to.val())
        } else {
            (to.val(), from.val())
        };
        let start: Degrees = self.minimum_safe.val();
        !(lo <= start && start <= hi)
    }
}

impl Default for AngleConfig {
    /// The reference installation: hardware origin 230° raw, user origin
    /// 20° cooked, forbidden arc from 335° to 315°.
    fn default() -> Self {
        Self {
            hardware_origin: RawAngle::new(HARDWARE_ORIGIN_DEFAULT),
            inverted: false,
            user_origin: CookedAngle::new(USER_ORIGIN_DEFAULT),
            linearization: Linearization::identity(),
            minimum_safe: CookedAngle::new(MINIMUM_SAFE_ANGLE_DEFAULT),
            maximum_safe: CookedAngle::new(MAXIMUM_SAFE_ANGLE_DEFAULT),
        }
    }
}

// ─── Kind-specific conveniences ─────────────────────────────────────

impl CookedAngle {
    /// Convert a sensor reading.
    #[inline]
    pub fn from_raw(raw: RawAngle, config: &AngleConfig) -> Self {
        config.cook(raw)
    }

    /// Convert an operator angle.
    #[inline]
    pub fn from_user(user: UserAngle, config: &AngleConfig) -> Self {
        config.from_user(user)
    }

    /// Raw reading that cooks to this angle.
    #[inline]
    pub fn to_raw(self, config: &AngleConfig) -> RawAngle {
        config.uncook(self)
    }

    /// Whether this angle lies outside the forbidden arc.
    #[inline]
    pub fn is_safe(self, config: &AngleConfig) -> bool {
        config.is_safe(self)
    }
}

impl UserAngle {
    /// Convert a cooked angle for display.
    #[inline]
    pub fn from_cooked(cooked: CookedAngle, config: &AngleConfig) -> Self {
        config.to_user(cooked)
    }

    #[inline]
    pub fn to_cooked(self, config: &AngleConfig) -> CookedAngle {
        config.from_user(self)
    }

    /// Same check as the equivalent cooked angle.
    #[inline]
    pub fn is_safe(self, config: &AngleConfig) -> bool {
        config.is_safe(config.from_user(self))
    }
}
