use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Letters usable as SelCal tones. I, N, O and T..Z are not assigned.
pub const SELCAL_ALPHABET: [char; 16] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'P', 'Q', 'R', 'S',
];

pub const DEFAULT_DELIMITER: &str = "-";

/// A validated four-letter selective-call code such as `CD-HJ`.
///
/// Only [`SelCalCode::parse`] constructs values, so every instance satisfies
/// the alphabet, uniqueness and pair-ordering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SelCalDigits", into = "SelCalDigits")]
pub struct SelCalCode {
    digits: [char; 4],
}

/// Wire shape: one string per digit.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SelCalDigits {
    digit1: String,
    digit2: String,
    digit3: String,
    digit4: String,
}

impl SelCalCode {
    /// Parse a raw code. Input is uppercased and stripped of whitespace and
    /// the default delimiter before validation; the first violated rule is
    /// reported.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized: String = raw
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| *c != ' ' && !DEFAULT_DELIMITER.contains(*c))
            .collect();

        let chars: Vec<char> = normalized.chars().collect();
        if chars.len() != 4 {
            return Err(ValidationError::InvalidFormat(normalized));
        }

        let mut seen = Vec::with_capacity(4);
        for &digit in &chars {
            if !SELCAL_ALPHABET.contains(&digit) {
                return Err(ValidationError::InvalidCharacter(digit));
            }
            if seen.contains(&digit) {
                return Err(ValidationError::DuplicateCharacter(digit));
            }
            seen.push(digit);
        }

        check_pair_order(chars[0], chars[1])?;
        check_pair_order(chars[2], chars[3])?;

        Ok(Self {
            digits: [chars[0], chars[1], chars[2], chars[3]],
        })
    }

    pub fn digit1(&self) -> char {
        self.digits[0]
    }

    pub fn digit2(&self) -> char {
        self.digits[1]
    }

    pub fn digit3(&self) -> char {
        self.digits[2]
    }

    pub fn digit4(&self) -> char {
        self.digits[3]
    }

    pub fn first_part(&self) -> String {
        self.digits[..2].iter().collect()
    }

    pub fn second_part(&self) -> String {
        self.digits[2..].iter().collect()
    }

    pub fn full_code(&self, delimiter: &str) -> String {
        format!("{}{}{}", self.first_part(), delimiter, self.second_part())
    }
}

fn check_pair_order(first: char, second: char) -> Result<(), ValidationError> {
    if first > second {
        return Err(ValidationError::OutOfOrder { first, second });
    }
    Ok(())
}

impl fmt::Display for SelCalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_code(DEFAULT_DELIMITER))
    }
}

impl FromStr for SelCalCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<SelCalDigits> for SelCalCode {
    type Error = ValidationError;

    fn try_from(value: SelCalDigits) -> Result<Self, Self::Error> {
        Self::parse(&format!(
            "{}{}{}{}",
            value.digit1, value.digit2, value.digit3, value.digit4
        ))
    }
}

impl From<SelCalCode> for SelCalDigits {
    fn from(code: SelCalCode) -> Self {
        Self {
            digit1: code.digit1().to_string(),
            digit2: code.digit2().to_string(),
            digit3: code.digit3().to_string(),
            digit4: code.digit4().to_string(),
        }
    }
}
