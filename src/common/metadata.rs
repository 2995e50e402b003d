use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

// Strength
//------------------------------------------------------------------------------

/// Error correction strength of a symbol.
///
/// Variants are ordered by increasing redundancy, so `Low < Medium < High < Highest`.
/// Each maps onto one of the four QR error correction levels:
///
/// | Strength  | QR level | Recoverable codewords |
/// |-----------|----------|-----------------------|
/// | `Low`     | L        | ~7%                   |
/// | `Medium`  | M        | ~15%                  |
/// | `High`    | Q        | ~25%                  |
/// | `Highest` | H        | ~30%                  |
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum Strength {
    Low,
    #[default]
    Medium,
    High,
    Highest,
}

impl Strength {
    /// Strengths tried, in order, when the caller does not pin one.
    pub const LADDER: [Strength; 3] = [Strength::Medium, Strength::High, Strength::Highest];

    pub const ALL: [Strength; 4] =
        [Strength::Low, Strength::Medium, Strength::High, Strength::Highest];

    /// Lowercase name, as accepted by [`FromStr`] and printed by the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Highest => "highest",
        }
    }

    /// Approximate share of the symbol devoted to redundancy, in percent.
    pub const fn redundancy(self) -> u8 {
        match self {
            Self::Low => 7,
            Self::Medium => 15,
            Self::High => 25,
            Self::Highest => 30,
        }
    }
}

impl Display for Strength {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = match *self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Highest => "Highest",
        };
        f.write_str(name)
    }
}

/// Returned when a strength name is not one of `low`, `medium`, `high`, `highest`.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("invalid recovery level {0:?}, must be: low, medium, high, highest")]
pub struct ParseStrengthError(String);

impl FromStr for Strength {
    type Err = ParseStrengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "highest" => Ok(Self::Highest),
            _ => Err(ParseStrengthError(s.to_string())),
        }
    }
}
