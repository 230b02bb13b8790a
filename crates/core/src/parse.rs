// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Numeric and boolean parsers for configuration values.
//!
//! Accepted shape: optional sign, optional base prefix (`0x`/`\x`/`H`
//! hex, `\0` octal, `\b`/`B` binary), digits, optional SI multiplier
//! suffix (`k m g t p x z y`, decimal; with a trailing `i`, 1024-based).
//! Intermediate arithmetic is 128-bit, so any in-range value with any
//! multiplier parses exactly; values that do not fit the target type
//! are `OutOfRange`.

use crate::error::{Error, Result};

/// Decimal multiplier exponent for an SI prefix character.
fn si_exponent(c: char) -> Option<u32> {
    match c.to_ascii_lowercase() {
        'k' => Some(1),
        'm' => Some(2),
        'g' => Some(3),
        't' => Some(4),
        'p' => Some(5),
        'x' => Some(6),
        'z' => Some(7),
        'y' => Some(8),
        _ => None,
    }
}

/// Split a trailing multiplier suffix off `s`, returning the numeric
/// part and the multiplier value.
fn split_multiplier(s: &str) -> Result<(&str, u128)> {
    let t = s.trim_end();
    let mut chars = t.chars().rev();
    let (last, binary) = match chars.next() {
        Some(c) if c == 'i' || c == 'I' => (chars.next(), true),
        c => (c, false),
    };
    let Some(last) = last else {
        return if binary { Err(Error::InvalidArgs) } else { Ok((t, 1)) };
    };
    let Some(exp) = si_exponent(last) else {
        return if binary {
            // A bare trailing 'i' with no prefix letter is garbage.
            Err(Error::InvalidArgs)
        } else {
            Ok((t, 1))
        };
    };
    let base: u128 = if binary { 1024 } else { 1000 };
    let mult = base
        .checked_pow(exp)
        .ok_or(Error::OutOfRange)?;
    let cut = t.len() - if binary { 2 } else { 1 };
    Ok((t[..cut].trim_end(), mult))
}

/// Split an optional base prefix, returning the digits and the radix.
fn split_base(s: &str) -> (&str, u32) {
    let bytes = s.as_bytes();
    if let Some(two) = s.get(..2) {
        if two.eq_ignore_ascii_case("0x") || two.eq_ignore_ascii_case("\\x") {
            return (&s[2..], 16);
        }
        if two.eq_ignore_ascii_case("\\0") {
            return (&s[2..], 8);
        }
        if two.eq_ignore_ascii_case("\\b") {
            return (&s[2..], 2);
        }
    }
    if !bytes.is_empty() {
        match bytes[0] {
            b'H' | b'h' => return (&s[1..], 16),
            b'B' | b'b' => return (&s[1..], 2),
            _ => {}
        }
    }
    (s, 10)
}

/// Parse into a signed 128-bit intermediate.
fn parse_i128(s: &str) -> Result<i128> {
    let mut t = s.trim();
    if t.is_empty() {
        return Err(Error::InvalidArgs);
    }
    let mut neg = false;
    if let Some(rest) = t.strip_prefix('-') {
        neg = true;
        t = rest.trim_start();
    } else if let Some(rest) = t.strip_prefix('+') {
        t = rest.trim_start();
    }
    let (t, radix) = split_base(t);
    let (digits, mult) = split_multiplier(t.trim_start())?;
    if digits.is_empty() {
        return Err(Error::InvalidArgs);
    }
    let magnitude = match u128::from_str_radix(digits, radix) {
        Ok(v) => v,
        // Well-formed digits that fail to parse overflowed the 128-bit
        // intermediate; anything else is not a number in this radix.
        Err(_) if digits.chars().all(|c| c.is_digit(radix)) => {
            return Err(Error::OutOfRange);
        }
        Err(_) => return Err(Error::InvalidArgs),
    };
    let magnitude = magnitude.checked_mul(mult).ok_or(Error::OutOfRange)?;
    if neg {
        if magnitude > (i128::MAX as u128) + 1 {
            return Err(Error::OutOfRange);
        }
        Ok((magnitude as i128).wrapping_neg())
    } else {
        i128::try_from(magnitude).map_err(|_| Error::OutOfRange)
    }
}

macro_rules! int_parser {
    ($(#[$doc:meta])* $name:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(s: &str) -> Result<$ty> {
            let v = parse_i128(s)?;
            <$ty>::try_from(v).map_err(|_| Error::OutOfRange)
        }
    };
}

int_parser!(
    /// Parse an `i16` configuration value.
    parse_i16, i16
);
int_parser!(
    /// Parse an `i32` configuration value.
    parse_i32, i32
);
int_parser!(
    /// Parse an `i64` configuration value.
    parse_i64, i64
);
int_parser!(
    /// Parse a `u16` configuration value.
    parse_u16, u16
);
int_parser!(
    /// Parse a `u32` configuration value.
    parse_u32, u32
);
int_parser!(
    /// Parse a `u64` configuration value.
    parse_u64, u64
);

/// Parse an `f64`, honoring the SI multiplier suffix. Garbage is
/// `NotANumber`.
pub fn parse_f64(s: &str) -> Result<f64> {
    let t = s.trim();
    if t.is_empty() {
        return Err(Error::NotANumber);
    }
    let (num, mult) = split_multiplier(t).map_err(|_| Error::NotANumber)?;
    let v: f64 = num.trim().parse().map_err(|_| Error::NotANumber)?;
    Ok(v * mult as f64)
}

/// Parse a boolean: `{true, yes, on, 1}` / `{false, no, off, 0}`,
/// case-insensitively.
pub fn parse_bool(s: &str) -> Result<bool> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("true")
        || t.eq_ignore_ascii_case("yes")
        || t.eq_ignore_ascii_case("on")
        || t == "1"
    {
        Ok(true)
    } else if t.eq_ignore_ascii_case("false")
        || t.eq_ignore_ascii_case("no")
        || t.eq_ignore_ascii_case("off")
        || t == "0"
    {
        Ok(false)
    } else {
        Err(Error::InvalidArgs)
    }
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
