//! Atomic-orbital basis sets and their evaluation in real space.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod ao;
pub mod gaussian;
pub(crate) mod solid_harmonics;

// ================
// Enum definitions
// ================

/// An enumerated type for the kinds of radial functions a TREXIO basis set can be built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasisKind {
    /// Gaussian-type radial functions.
    Gaussian,

    /// Slater-type radial functions.
    Slater,

    /// Numerical radial functions.
    Numerical,

    /// Plane waves.
    PlaneWave,
}

impl fmt::Display for BasisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisKind::Gaussian => write!(f, "Gaussian"),
            BasisKind::Slater => write!(f, "Slater"),
            BasisKind::Numerical => write!(f, "Numerical"),
            BasisKind::PlaneWave => write!(f, "PW"),
        }
    }
}

/// Error arising from an unrecognised basis type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasisKindParseError(pub String);

impl fmt::Display for BasisKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unrecognised basis type `{}`.", self.0)
    }
}

impl Error for BasisKindParseError {}

impl FromStr for BasisKind {
    type Err = BasisKindParseError;

    /// Parses a TREXIO `basis.type` string. The comparison ignores case and surrounding
    /// whitespace, since fixed-length string attributes may carry trailing padding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        match trimmed.to_lowercase().as_str() {
            "gaussian" => Ok(BasisKind::Gaussian),
            "slater" => Ok(BasisKind::Slater),
            "numerical" => Ok(BasisKind::Numerical),
            "pw" | "planewave" | "plane wave" => Ok(BasisKind::PlaneWave),
            _ => Err(BasisKindParseError(s.to_string())),
        }
    }
}
