//! Coordinate notation helpers.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Compass direction attached to a DMS coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    fn sign(self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }
}

impl FromStr for Hemisphere {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Hemisphere::North),
            "S" => Ok(Hemisphere::South),
            "E" => Ok(Hemisphere::East),
            "W" => Ok(Hemisphere::West),
            _ => Err(Error::InvalidHemisphere {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Hemisphere::North => "N",
            Hemisphere::South => "S",
            Hemisphere::East => "E",
            Hemisphere::West => "W",
        };
        f.write_str(value)
    }
}

/// Convert degrees/minutes/seconds to signed decimal degrees. South and West
/// are negative.
pub fn dms_to_decimal(degrees: u32, minutes: u32, seconds: f64, hemisphere: Hemisphere) -> f64 {
    let magnitude = f64::from(degrees) + f64::from(minutes) / 60.0 + seconds / 3600.0;
    magnitude * hemisphere.sign()
}
