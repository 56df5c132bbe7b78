//! Player identifiers.

use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a player.
///
/// Players are identified by their 128-bit account UUID. Ordering follows the
/// raw numeric value, which gives every map keyed by player a stable iteration
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uuid(u128);

impl Uuid {
    /// Sentinel for "no player".
    ///
    /// Also used as the single pseudo-player when progress is tracked by hand.
    pub const EMPTY: Self = Self(0);

    /// Creates a player ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Checks if this is the empty sentinel.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parses a UUID in hyphenated (`8-4-4-4-12`) or plain 32-digit hex form.
    pub fn parse(text: &str) -> Result<Self, TrackerError> {
        let trimmed = text.trim();
        let groups: Vec<&str> = trimmed.split('-').collect();
        let well_formed = match groups.as_slice() {
            [single] => single.len() == 32,
            [a, b, c, d, e] => {
                a.len() == 8 && b.len() == 4 && c.len() == 4 && d.len() == 4 && e.len() == 12
            },
            _ => false,
        };
        if !well_formed {
            return Err(TrackerError::InvalidUuid(text.to_string()));
        }

        let digits: String = groups.concat();
        u128::from_str_radix(&digits, 16)
            .map(Self)
            .map_err(|_| TrackerError::InvalidUuid(text.to_string()))
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = format!("{:032x}", self.0);
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

impl FromStr for Uuid {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Uuid {
    type Error = TrackerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Uuid> for String {
    fn from(value: Uuid) -> Self {
        value.to_string()
    }
}
