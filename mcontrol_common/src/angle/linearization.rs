//! Harmonic linearization of the raw sensor reading.
//!
//! ```text
//! linearized = raw - k(1,1)*cos(1*raw) - k(1,2)*sin(1*raw)
//!                  - k(2,1)*cos(2*raw) - k(2,2)*sin(2*raw)
//!                  - ...
//! ```
//!
//! Coefficients are in degrees; the trigonometric arguments are the raw
//! reading in radians.

use heapless::Vec;

use super::Degrees;
use super::config::AngleConfigError;
use crate::consts::{MAX_HARMONICS, UNCOOK_ITERATIONS};

/// Harmonic correction terms, one `[cos, sin]` pair per order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linearization {
    pairs: Vec<[f64; 2], MAX_HARMONICS>,
}

impl Linearization {
    /// No correction.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build from a flat list ordered `k(1,1), k(1,2), k(2,1), k(2,2), ...`.
    ///
    /// # Errors
    ///
    /// - `OddCoefficientCount` if the list does not hold whole pairs
    /// - `TooManyHarmonics` if it holds more than `MAX_HARMONICS` pairs
    /// - `NonFinite` if any coefficient is NaN or infinite
    pub fn from_coefficients(coefficients: &[f64]) -> Result<Self, AngleConfigError> {
        if coefficients.len() % 2 != 0 {
            return Err(AngleConfigError::OddCoefficientCount(coefficients.len()));
        }
        let mut pairs = Vec::new();
        for pair in coefficients.chunks_exact(2) {
            pairs
                .push([pair[0], pair[1]])
                .map_err(|_| AngleConfigError::TooManyHarmonics {
                    count: coefficients.len() / 2,
                    max: MAX_HARMONICS,
                })?;
        }
        if let Some(bad) = coefficients.iter().find(|k| !k.is_finite()) {
            return Err(AngleConfigError::NonFinite {
                field: "linearization",
                value: *bad,
            });
        }
        Ok(Self { pairs })
    }

    /// Number of harmonic orders.
    #[inline]
    pub fn harmonics(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.pairs.iter().all(|[c, s]| *c == 0.0 && *s == 0.0)
    }

    /// Coefficient pairs, lowest order first.
    #[inline]
    pub fn pairs(&self) -> &[[f64; 2]] {
        &self.pairs
    }

    /// Sum of the harmonic terms at `raw` [deg].
    pub fn correction(&self, raw: Degrees) -> Degrees {
        let raw_rad = raw.to_radians();
        self.pairs
            .iter()
            .enumerate()
            .map(|(idx, [k_cos, k_sin])| {
                let order = (idx + 1) as f64;
                let (sin, cos) = (order * raw_rad).sin_cos();
                k_cos * cos + k_sin * sin
            })
            .sum()
    }

    /// Apply the correction to a raw reading.
    #[inline]
    pub fn linearize(&self, raw: Degrees) -> Degrees {
        raw - self.correction(raw)
    }

    /// Find the raw reading that linearizes to `linearized`.
    ///
    /// Fixed-point iteration on `raw = linearized + correction(raw)`.
    /// Converges when the correction slope stays below one, which holds for
    /// any physically sensible sensor calibration.
    pub fn delinearize(&self, linearized: Degrees) -> Degrees {
        if self.pairs.is_empty() {
            return linearized;
        }
        let mut raw = linearized;
        for _ in 0..UNCOOK_ITERATIONS {
            let next = linearized + self.correction(raw);
            if (next - raw).abs() < 1e-12 {
                return next;
            }
            raw = next;
        }
        raw
    }
}
