use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An inclusive `MIN-MAX` range of whole numbers, written as `N` or `MIN-MAX`.
///
/// Ranges are sampled once per use, so `likes_count: 2-4` yields a fresh count
/// for every target and `repeat: 120-180` a fresh pause between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeRepr", into = "String")]
pub struct ValueRange {
    min: u64,
    max: u64,
}

impl ValueRange {
    pub fn fixed(value: u64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Const constructor for defaults; bounds are swapped if given reversed.
    pub const fn between(a: u64, b: u64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn new(min: u64, max: u64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::Range(format!("{min}-{max}")));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Pick a value in `[min, max]` using the supplied random source.
    pub fn sample(&self, rand_u64: impl FnOnce() -> u64) -> u64 {
        if self.is_fixed() {
            return self.min;
        }
        let span = self.max - self.min;
        match span.checked_add(1) {
            Some(width) => self.min + rand_u64() % width,
            None => rand_u64(),
        }
    }
}

impl FromStr for ValueRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let parse = |v: &str| {
            v.trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Range(raw.to_string()))
        };
        match raw.split_once('-') {
            Some((lo, hi)) => {
                let (min, max) = (parse(lo)?, parse(hi)?);
                ValueRange::new(min, max).map_err(|_| ConfigError::Range(raw.to_string()))
            }
            None => Ok(ValueRange::fixed(parse(raw)?)),
        }
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fixed() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

impl From<ValueRange> for String {
    fn from(r: ValueRange) -> Self {
        r.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RangeRepr {
    Number(u64),
    Text(String),
}

impl TryFrom<RangeRepr> for ValueRange {
    type Error = ConfigError;

    fn try_from(repr: RangeRepr) -> Result<Self, Self::Error> {
        match repr {
            RangeRepr::Number(n) => Ok(ValueRange::fixed(n)),
            RangeRepr::Text(s) => s.parse(),
        }
    }
}

/// A probability expressed in whole percent, `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    pub const NEVER: Percentage = Percentage(0);
    pub const ALWAYS: Percentage = Percentage(100);

    pub fn new(value: u8) -> Result<Self, ConfigError> {
        if value > 100 {
            return Err(ConfigError::Range(format!("{value}%")));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Roll the dice once. `0` never fires and `100` always fires without
    /// consuming randomness.
    pub fn roll(&self, rand_u64: impl FnOnce() -> u64) -> bool {
        match self.0 {
            0 => false,
            100 => true,
            p => rand_u64() % 100 < u64::from(p),
        }
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Percentage::new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl FromStr for Percentage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().trim_end_matches('%');
        let value = raw
            .parse::<u8>()
            .map_err(|_| ConfigError::Range(s.to_string()))?;
        Percentage::new(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
