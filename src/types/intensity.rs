//! Blend intensity between the original image and the duotone gradient.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChromaError, Result};

/// Blend factor in `[0.0, 1.0]`.
///
/// `0.0` leaves the image untouched, `1.0` replaces every pixel with its
/// gradient colour. A value of this type is always in range, so the
/// duotone engine never has to validate it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "RawIntensity", into = "f64")]
pub struct Intensity(f64);

impl Intensity {
    /// Original image.
    pub const NONE: Self = Self(0.0);

    /// Full duotone effect.
    pub const FULL: Self = Self(1.0);

    /// Create an intensity, rejecting NaN and values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ChromaError::InvalidIntensity { value })
        }
    }

    /// Create an intensity, clamping into `[0, 1]`. NaN becomes `0`.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self::NONE
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Create an intensity from a percentage in `[0, 100]`.
    pub fn from_percent(percent: f64) -> Result<Self> {
        Self::new(percent / 100.0).map_err(|_| ChromaError::InvalidIntensity { value: percent })
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whole-number percentage, as shown to the user.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::FULL
    }
}

impl FromStr for Intensity {
    type Err = ChromaError;

    /// Accepts a fraction (`0.4`) or a percentage (`40%`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let parse = |text: &str| {
            text.trim().parse::<f64>().map_err(|_| ChromaError::Parse {
                message: format!("Invalid intensity: {}", s),
                help: Some("Use a value between 0 and 1, or a percentage such as 40%".to_string()),
            })
        };

        match s.strip_suffix('%') {
            Some(percent) => Self::from_percent(parse(percent)?),
            None => Self::new(parse(s)?),
        }
    }
}

impl From<Intensity> for f64 {
    fn from(i: Intensity) -> Self {
        i.0
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Config files may spell intensity as a number or a percentage string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIntensity {
    Number(f64),
    Text(String),
}

impl TryFrom<RawIntensity> for Intensity {
    type Error = ChromaError;

    fn try_from(raw: RawIntensity) -> Result<Self> {
        match raw {
            RawIntensity::Number(n) => Self::new(n),
            RawIntensity::Text(s) => s.parse(),
        }
    }
}
