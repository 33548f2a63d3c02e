use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

pub const MILLIJOULES_PER_JOULE: i64 = 1_000;
pub const JOULES_PER_KILOJOULE: i64 = 1_000;
pub const MILLIJOULES_PER_KILOJOULE: i64 = MILLIJOULES_PER_JOULE * JOULES_PER_KILOJOULE;
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const MINUTES_PER_HOUR: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const HOURS_PER_DAY: i64 = 24;
pub const SECONDS_PER_DAY: i64 = SECONDS_PER_HOUR * HOURS_PER_DAY;

/// A quantity of energy, held as a whole number of millijoules so that repeated
/// charging and draining never accumulates floating point drift.
///
/// The value is signed so the same type can carry deltas; stored levels are kept
/// non-negative by the owners that clamp them. Arithmetic saturates at the `i64` bounds.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Energy(i64);

impl Energy {
    pub const ZERO: Energy = Energy(0);

    pub const fn from_millijoule(millijoules: i64) -> Self {
        Self(millijoules)
    }

    pub const fn from_joule(joules: i64) -> Self {
        Self(joules * MILLIJOULES_PER_JOULE)
    }

    pub const fn from_kilojoule(kilojoules: i64) -> Self {
        Self(kilojoules * MILLIJOULES_PER_KILOJOULE)
    }

    pub const fn as_millijoule(&self) -> i64 {
        self.0
    }

    /// Whole joules, truncated toward zero.
    pub const fn as_joule(&self) -> i64 {
        self.0 / MILLIJOULES_PER_JOULE
    }

    /// Whole kilojoules, truncated toward zero.
    pub const fn as_kilojoule(&self) -> i64 {
        self.0 / MILLIJOULES_PER_KILOJOULE
    }

    pub fn as_joule_f64(&self) -> f64 {
        self.0 as f64 / MILLIJOULES_PER_JOULE as f64
    }

    pub fn as_kilojoule_f64(&self) -> f64 {
        self.0 as f64 / MILLIJOULES_PER_KILOJOULE as f64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Rounds toward zero to a whole multiple of `unit`.
    pub(crate) fn truncate_to(&self, unit: Energy) -> Self {
        if unit.0 <= 0 {
            return *self;
        }
        Self(self.0 / unit.0 * unit.0)
    }

    pub(crate) fn saturating_sub(&self, other: Energy) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Clamps into `[Energy::ZERO, max]`. A negative `max` is treated as zero.
    pub(crate) fn clamp_to_capacity(&self, max: Energy) -> Self {
        let max = max.max(Energy::ZERO);
        (*self).clamp(Energy::ZERO, max)
    }
}

impl Add for Energy {
    type Output = Energy;

    fn add(self, rhs: Self) -> Self::Output {
        Energy(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Energy {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Energy {
    type Output = Energy;

    fn sub(self, rhs: Self) -> Self::Output {
        Energy(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Energy {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Energy {
    type Output = Energy;

    fn neg(self) -> Self::Output {
        Energy(self.0.saturating_neg())
    }
}

impl Sum for Energy {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Energy::ZERO, |acc, energy| acc + energy)
    }
}

impl<'a> Sum<&'a Energy> for Energy {
    fn sum<I: Iterator<Item = &'a Energy>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Display for Energy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 % MILLIJOULES_PER_KILOJOULE == 0 {
            write!(f, "{} kJ", self.as_kilojoule())
        } else if self.0 % MILLIJOULES_PER_JOULE == 0 {
            write!(f, "{} J", self.as_joule())
        } else {
            write!(f, "{} mJ", self.0)
        }
    }
}

impl FromStr for Energy {
    type Err = EnergyParseError;

    /// Parses strings such as `"100 kJ"`, `"10500 J"` or `"-5mJ"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split_at = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| EnergyParseError::MissingUnit(s.to_owned()))?;
        let (amount, unit) = s.split_at(split_at);
        let amount = amount
            .trim()
            .parse::<i64>()
            .map_err(|_| EnergyParseError::InvalidAmount(s.to_owned()))?;
        let millijoules_per_unit = match unit.trim() {
            "mJ" => 1,
            "J" => MILLIJOULES_PER_JOULE,
            "kJ" => MILLIJOULES_PER_KILOJOULE,
            other => return Err(EnergyParseError::UnknownUnit(other.to_owned())),
        };
        amount
            .checked_mul(millijoules_per_unit)
            .map(Energy)
            .ok_or_else(|| EnergyParseError::OutOfRange(s.to_owned()))
    }
}

impl TryFrom<String> for Energy {
    type Error = EnergyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Energy> for String {
    fn from(value: Energy) -> Self {
        value.to_string()
    }
}

#[cfg(feature = "schemars")]
impl schemars::JsonSchema for Energy {
    fn schema_name() -> String {
        "Energy".to_owned()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EnergyParseError {
    #[error("Energy value '{0}' has no unit (expected one of mJ, J, kJ)")]
    MissingUnit(String),
    #[error("Energy value '{0}' does not start with a whole number")]
    InvalidAmount(String),
    #[error("Unknown energy unit '{0}' (expected one of mJ, J, kJ)")]
    UnknownUnit(String),
    #[error("Energy value '{0}' is too large to represent")]
    OutOfRange(String),
}
