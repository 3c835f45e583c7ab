//! Trigger mode and attack kind enums

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the trigger does on `apply`
///
/// One epoch walks `Train → EvalClean → EvalBackdoor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Imprint on poison carriers only, stochastically
    #[default]
    Train = 0,
    /// Never imprint
    EvalClean = 1,
    /// Always imprint and relabel to the target
    EvalBackdoor = 2,
}

impl TriggerMode {
    /// Numeric code of the mode
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for TriggerMode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Train),
            1 => Ok(Self::EvalClean),
            2 => Ok(Self::EvalBackdoor),
            other => Err(Error::InvalidMode(other)),
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Train => write!(f, "train"),
            Self::EvalClean => write!(f, "eval_clean"),
            Self::EvalBackdoor => write!(f, "eval_backdoor"),
        }
    }
}

/// Supported backdoor attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    /// Checkerboard patch in the bottom-right corner
    #[default]
    BadNets,
    /// Alpha blend with a fixed noise pattern
    Blend,
    /// Horizontal sinusoidal signal
    Sig,
}

impl AttackKind {
    /// All supported attacks
    pub const ALL: [AttackKind; 3] = [Self::BadNets, Self::Blend, Self::Sig];
}

impl FromStr for AttackKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "badnets" => Ok(Self::BadNets),
            "blend" | "blended" => Ok(Self::Blend),
            "sig" => Ok(Self::Sig),
            _ => Err(format!(
                "Unknown attack: {s}. Valid attacks: badnets, blend, sig"
            )),
        }
    }
}

impl fmt::Display for AttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadNets => write!(f, "badnets"),
            Self::Blend => write!(f, "blend"),
            Self::Sig => write!(f, "sig"),
        }
    }
}
