// Leading digit value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// First significant decimal digit of a value, always in `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LeadingDigit(u8);

impl LeadingDigit {
    pub const ALL: [LeadingDigit; 9] = [
        LeadingDigit(1),
        LeadingDigit(2),
        LeadingDigit(3),
        LeadingDigit(4),
        LeadingDigit(5),
        LeadingDigit(6),
        LeadingDigit(7),
        LeadingDigit(8),
        LeadingDigit(9),
    ];

    pub fn new(digit: u8) -> Option<Self> {
        (1..=9).contains(&digit).then_some(Self(digit))
    }

    /// Strips every non-digit character and leading zeros, then takes the
    /// first remaining digit. `"0.0456"` gives 4, `"-732"` gives 7.
    pub fn from_text(raw: &str) -> Option<Self> {
        raw.chars()
            .filter(char::is_ascii_digit)
            .find(|c| *c != '0')
            .and_then(|c| c.to_digit(10))
            .and_then(|digit| Self::new(digit as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for LeadingDigit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("leading digit out of range: {}", value))
    }
}

impl From<LeadingDigit> for u8 {
    fn from(value: LeadingDigit) -> Self {
        value.0
    }
}

impl fmt::Display for LeadingDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
