//! Swedish personal identity numbers (personnummer and samordningsnummer).
//!
//! Accepted input: `YYMMDD-NNNC`, `YYMMDD+NNNC`, `YYMMDDNNNC` and the same with
//! a two-digit century prefix. `+` marks a person aged 100 or more when no
//! century is given. The check digit `C` is the Luhn digit over `YYMMDDNNN`.
//! Coordination numbers carry the birth day plus 60.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::IdentityError;

const COORDINATION_DAY_OFFSET: u32 = 60;

/// A validated identity number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityNumber {
    full_year: i32,
    month: u32,
    /// Day as written, including the coordination offset
    day: u32,
    serial: u16,
    check: u8,
    centenarian: bool,
}

impl IdentityNumber {
    /// Fixed-width 10-digit form `YYMMDDNNNC` used for caching and messages.
    ///
    /// The century and the `+` marker are not part of it: `121212+1212` and
    /// `121212-1212` share one canonical string, and parsing it back resolves
    /// to the most recent century. Use [`IdentityNumber::long_format`] when the
    /// birth year matters.
    pub fn canonical(&self) -> String {
        format!(
            "{:02}{:02}{:02}{:03}{}",
            self.full_year.rem_euclid(100),
            self.month,
            self.day,
            self.serial,
            self.check
        )
    }

    /// `YYYYMMDDNNNC`
    pub fn long_format(&self) -> String {
        format!(
            "{:04}{:02}{:02}{:03}{}",
            self.full_year, self.month, self.day, self.serial, self.check
        )
    }

    /// `YYMMDD-NNNC`, or `YYMMDD+NNNC` for people aged 100 or more
    pub fn short_format(&self) -> String {
        let canonical = self.canonical();
        let separator = if self.centenarian { '+' } else { '-' };
        format!("{}{}{}", &canonical[..6], separator, &canonical[6..])
    }

    pub fn is_coordination_number(&self) -> bool {
        self.day > COORDINATION_DAY_OFFSET
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.full_year, self.month, self.birth_day())
    }

    fn birth_day(&self) -> u32 {
        if self.is_coordination_number() {
            self.day - COORDINATION_DAY_OFFSET
        } else {
            self.day
        }
    }
}

impl fmt::Display for IdentityNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for IdentityNumber {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

/// Validate against the current local year
pub fn validate(raw: &str) -> Result<IdentityNumber, IdentityError> {
    validate_at(raw, chrono::Local::now().year())
}

/// Validate with an explicit reference year for resolving two-digit years
pub fn validate_at(raw: &str, reference_year: i32) -> Result<IdentityNumber, IdentityError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdentityError::Missing);
    }

    let (digits, separator) = split_separator(trimmed)?;
    let (century, rest) = match digits.len() {
        12 => (Some(number(&digits[..2])), &digits[2..]),
        10 => (None, digits.as_str()),
        _ => return Err(IdentityError::Invalid),
    };

    let year = number(&rest[..2]) as i32;
    let month = number(&rest[2..4]);
    let day = number(&rest[4..6]);
    let serial = number(&rest[6..9]) as u16;
    let check = number(&rest[9..10]) as u8;

    if serial == 0 {
        return Err(IdentityError::Invalid);
    }
    if luhn_check_digit(&rest[..9]) != check {
        return Err(IdentityError::Invalid);
    }

    let full_year = match century {
        Some(century) => century as i32 * 100 + year,
        None => {
            let base = if separator == Some('+') {
                reference_year - 100
            } else {
                reference_year
            };
            base - (base - year).rem_euclid(100)
        }
    };
    let centenarian = match century {
        Some(_) => reference_year - full_year >= 100,
        None => separator == Some('+'),
    };

    let identity = IdentityNumber {
        full_year,
        month,
        day,
        serial,
        check,
        centenarian,
    };
    if identity.birth_day() == 0 || identity.birth_date().is_none() {
        return Err(IdentityError::Invalid);
    }

    Ok(identity)
}

/// Split off an optional `-`/`+` in front of the last four digits
fn split_separator(input: &str) -> Result<(String, Option<char>), IdentityError> {
    let chars: Vec<char> = input.chars().collect();
    let mut separator = None;
    let mut digits = String::with_capacity(chars.len());

    for (index, c) in chars.iter().enumerate() {
        match c {
            '0'..='9' => digits.push(*c),
            '-' | '+' if separator.is_none() && index + 5 == chars.len() => separator = Some(*c),
            _ => return Err(IdentityError::Invalid),
        }
    }

    Ok((digits, separator))
}

/// Parse a run of ASCII digits already checked by `split_separator`
fn number(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Luhn digit with weights 2,1,2,1,... from the left
fn luhn_check_digit(digits: &str) -> u8 {
    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(index, b)| {
            let value = u32::from(b - b'0') * if index % 2 == 0 { 2 } else { 1 };
            if value > 9 {
                value - 9
            } else {
                value
            }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}
