//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{ChromaError, Result};

/// An opaque RGB colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Default highlight colour.
    pub const BRAVE_PINK: Self = Self::rgb(255, 105, 180);

    /// Default shadow colour.
    pub const HERO_GREEN: Self = Self::rgb(1, 110, 60);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Build a colour from wide integer components, rejecting anything
    /// outside 0..=255.
    pub fn from_components(r: i64, g: i64, b: i64) -> Result<Self> {
        Ok(Self::rgb(
            component('r', r)?,
            component('g', g)?,
            component('b', b)?,
        ))
    }

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RRGGBB` (6 digits)
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        match hex.len() {
            3 if hex.is_ascii() => {
                // #RGB -> #RRGGBB
                let digits = hex
                    .chars()
                    .map(parse_hex_digit)
                    .collect::<Result<Vec<u8>>>()?;
                let (r, g, b) = (digits[0], digits[1], digits[2]);
                Ok(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 if hex.is_ascii() => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                Ok(Self::rgb(r, g, b))
            }
            _ => Err(ChromaError::Parse {
                message: format!("Invalid hex colour: {}", s),
                help: Some("Use #RGB or #RRGGBB format".to_string()),
            }),
        }
    }

    /// Look up a CSS/SVG colour keyword such as `hotpink`.
    pub fn from_name(name: &str) -> Option<Self> {
        palette::named::from_str(&name.trim().to_ascii_lowercase()).map(Self::from)
    }

    /// Parse an `r,g,b` triple of decimal components.
    pub fn from_triple(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let &[r, g, b] = parts.as_slice() else {
            return Err(ChromaError::Parse {
                message: format!("Invalid colour triple: {}", s),
                help: Some("Use three comma-separated components, e.g. 255,105,180".to_string()),
            });
        };

        let parse = |part: &str| {
            part.parse::<i64>().map_err(|_| ChromaError::Parse {
                message: format!("Invalid colour component: {}", part),
                help: None,
            })
        };

        Self::from_components(parse(r)?, parse(g)?, parse(b)?)
    }

    /// Convert to an RGB array.
    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<Srgb<u8>> for Colour {
    fn from(c: Srgb<u8>) -> Self {
        Self::rgb(c.red, c.green, c.blue)
    }
}

impl FromStr for Colour {
    type Err = ChromaError;

    /// Accepts hex (`#ff69b4`), a colour name (`hotpink`) or `r,g,b`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.contains(',') {
            return Self::from_triple(s);
        }
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        if let Some(named) = Self::from_name(s) {
            return Ok(named);
        }
        Self::from_hex(s).map_err(|_| ChromaError::Parse {
            message: format!("Unknown colour: {}", s),
            help: Some("Use #RRGGBB, a CSS colour name, or r,g,b".to_string()),
        })
    }
}

impl TryFrom<String> for Colour {
    type Error = ChromaError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn component(name: char, value: i64) -> Result<u8> {
    u8::try_from(value).map_err(|_| ChromaError::InvalidColorComponent {
        component: name,
        value,
    })
}

/// Parse a single hex digit.
fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| ChromaError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| ChromaError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}
