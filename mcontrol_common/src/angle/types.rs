//! Angle value types.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Sub};

use static_assertions::{assert_impl_all, assert_not_impl_any};

use super::{Degrees, mod360};

// ─── Raw ────────────────────────────────────────────────────────────

/// Bare sensor readout in `[0, 360)`.
///
/// Not a true angle: the sensor may be nonlinear, so there is no
/// subtraction or comparison between raw values. Offset addition wraps.
#[derive(Debug, Clone, Copy)]
pub struct RawAngle(Degrees);

impl RawAngle {
    /// Create a raw angle, normalized into `[0, 360)`.
    #[inline]
    pub fn new(value: Degrees) -> Self {
        Self(mod360(value))
    }

    /// Value in degrees.
    #[inline]
    pub const fn val(self) -> Degrees {
        self.0
    }
}

impl Add<Degrees> for RawAngle {
    type Output = RawAngle;

    #[inline]
    fn add(self, deg: Degrees) -> RawAngle {
        RawAngle::new(self.0 + deg)
    }
}

impl fmt::Display for RawAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}° raw", self.0)
    }
}

// ─── Generic angle ──────────────────────────────────────────────────

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Cooked {}
    impl Sealed for super::User {}
}

/// Kind tag for [`Angle`]. Sealed: the two kinds below are the only ones.
pub trait AngleKind: sealed::Sealed + Copy + fmt::Debug + 'static {
    /// Short label used in formatted output.
    const LABEL: &'static str;
}

/// Tag for cooked angles.
#[derive(Debug, Clone, Copy)]
pub enum Cooked {}

/// Tag for user angles.
#[derive(Debug, Clone, Copy)]
pub enum User {}

impl AngleKind for Cooked {
    const LABEL: &'static str = "cooked";
}

impl AngleKind for User {
    const LABEL: &'static str = "user";
}

/// An angle of kind `K`.
///
/// Comparison, difference (in degrees) and offset arithmetic are defined
/// only between angles of the same kind.
#[derive(Clone, Copy)]
pub struct Angle<K: AngleKind> {
    val: Degrees,
    kind: PhantomData<K>,
}

/// The controller's working angle.
pub type CookedAngle = Angle<Cooked>;

/// Operator-facing angle.
pub type UserAngle = Angle<User>;

impl<K: AngleKind> Angle<K> {
    /// Wrap a value in degrees. No normalization is applied.
    #[inline]
    pub const fn new(val: Degrees) -> Self {
        Self {
            val,
            kind: PhantomData,
        }
    }

    /// Value in degrees.
    #[inline]
    pub const fn val(self) -> Degrees {
        self.val
    }
}

impl<K: AngleKind> PartialEq for Angle<K> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl<K: AngleKind> PartialOrd for Angle<K> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.val.partial_cmp(&other.val)
    }
}

/// Difference between two angles in degrees.
impl<K: AngleKind> Sub for Angle<K> {
    type Output = Degrees;

    #[inline]
    fn sub(self, other: Self) -> Degrees {
        self.val - other.val
    }
}

impl<K: AngleKind> Add<Degrees> for Angle<K> {
    type Output = Self;

    #[inline]
    fn add(self, deg: Degrees) -> Self {
        Self::new(self.val + deg)
    }
}

impl<K: AngleKind> Sub<Degrees> for Angle<K> {
    type Output = Self;

    #[inline]
    fn sub(self, deg: Degrees) -> Self {
        Self::new(self.val - deg)
    }
}

impl<K: AngleKind> fmt::Debug for Angle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Angle<{}>({})", K::LABEL, self.val)
    }
}

impl<K: AngleKind> fmt::Display for Angle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}° {}", self.val, K::LABEL)
    }
}

// Mixing kinds must be a build error.
assert_not_impl_any!(CookedAngle: Sub<UserAngle>, PartialOrd<UserAngle>, PartialEq<UserAngle>);
assert_not_impl_any!(UserAngle: Sub<CookedAngle>, PartialOrd<CookedAngle>, PartialEq<CookedAngle>);
assert_not_impl_any!(RawAngle: Sub<RawAngle>, PartialOrd, PartialEq);
assert_impl_all!(CookedAngle: Copy, Send, Sync, Sub<CookedAngle>, Add<Degrees>, PartialOrd);
assert_impl_all!(UserAngle: Copy, Send, Sync, Sub<UserAngle>, Add<Degrees>, PartialOrd);
