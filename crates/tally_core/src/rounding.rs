//! Integer-first percentages.
//!
//! A `Percent` holds hundredths of a percent, so `37.05%` is `Percent(3705)`.
//! Values are derived with integer arithmetic only and rounded half away from
//! zero; a zero denominator yields 0. Serialized as a JSON number with two
//! decimals.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(u32);

impl Percent {
    pub const ZERO: Percent = Percent(0);

    #[inline]
    pub const fn from_hundredths(h: u32) -> Self {
        Self(h)
    }

    #[inline]
    pub const fn hundredths(self) -> u32 {
        self.0
    }

    /// `num / den * 100`, two decimals, half away from zero.
    pub fn of(num: u64, den: u64) -> Self {
        Self(percent_hundredths(num, den))
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

/// Hundredths of a percent of `num / den`; 0 when `den == 0`.
///
/// Saturates at `u32::MAX` when `num` is vastly larger than `den`, which
/// cannot happen for shares of a total.
pub fn percent_hundredths(num: u64, den: u64) -> u32 {
    if den == 0 {
        return 0;
    }
    let n = u128::from(num) * 10_000;
    let d = u128::from(den);
    let q = n / d;
    let r = n % d;
    let rounded = if r * 2 >= d { q + 1 } else { q };
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = f64::deserialize(d)?;
        if !(0.0..=f64::from(u32::MAX) / 100.0).contains(&v) {
            return Err(serde::de::Error::custom(format!("percent out of range: {v}")));
        }
        Ok(Percent((v * 100.0).round() as u32))
    }
}
