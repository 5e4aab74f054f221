//! Fixed-point and binary-angle scalars.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of fractional bits in a [`Fixed`].
pub const FRACBITS: u32 = 16;

/// `1.0` in [`Fixed`] representation.
pub const FRACUNIT: i32 = 1 << FRACBITS;

/// A 16.16 fixed-point number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fixed(pub i32);

impl Fixed {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One.
    pub const ONE: Self = Self(FRACUNIT);

    /// Converts a double, truncating toward zero and saturating.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_f64(value: f64) -> Self {
        Self((value * f64::from(FRACUNIT)) as i32)
    }

    /// Converts back to a double.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / f64::from(FRACUNIT)
    }

    /// Returns the raw 16.16 bits.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

/// A binary angle: the full circle maps onto the `u32` range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Angle(pub u32);

impl Angle {
    /// 90 degrees.
    pub const ANG90: Self = Self(0x4000_0000);

    /// Converts degrees, wrapping into one turn.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_degrees(degrees: f64) -> Self {
        let turns = (degrees / 360.0).rem_euclid(1.0);
        Self(((turns * 4_294_967_296.0) as u64) as u32)
    }

    /// Converts back to degrees in `[0, 360)`.
    #[must_use]
    pub fn to_degrees(self) -> f64 {
        f64::from(self.0) / 4_294_967_296.0 * 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_truncates_toward_zero() {
        assert_eq!(Fixed::from_f64(1.5), Fixed(0x18000));
        assert_eq!(Fixed::from_f64(-0.5), Fixed(-0x8000));
        assert_eq!(Fixed::from_f64(1.0 / 131_072.0), Fixed(0));
        assert!((Fixed(0x28000).to_f64() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn fixed_saturates() {
        assert_eq!(Fixed::from_f64(1e12), Fixed(i32::MAX));
    }

    #[test]
    fn angle_quadrants() {
        assert_eq!(Angle::from_degrees(90.0), Angle::ANG90);
        assert_eq!(Angle::from_degrees(180.0), Angle(0x8000_0000));
        assert_eq!(Angle::from_degrees(360.0), Angle(0));
        assert_eq!(Angle::from_degrees(-90.0), Angle(0xC000_0000));
    }
}
