//! Magnitude normalization for netlist values.
//!
//! SPICE accepts magnitudes either as plain numbers (`0.001`, `2e-3`) or with
//! a metric suffix (`1m`, `4.7k`, `1Meg`). Every numeric field an element
//! emits goes through [`format_value`] so the same magnitude always renders
//! the same way regardless of how the caller spelled it.
//!
//! # Suffixes
//!
//! | Suffix | Multiplier |
//! |--------|------------|
//! | T | 1e12 |
//! | G | 1e9 |
//! | Meg, M | 1e6 |
//! | K, k | 1e3 |
//! | mil | 25.4e-6 |
//! | m | 1e-3 |
//! | u, µ | 1e-6 |
//! | n | 1e-9 |
//! | p | 1e-12 |
//! | f | 1e-15 |
//! | a | 1e-18 |
//!
//! `Meg` and `mil` are matched case-insensitively; all other suffixes are
//! case-sensitive, so `m` (milli) and `M` (mega) stay distinct.

use std::fmt;

use crate::error::{NetlistError, Result};

/// Significant digits used when formatting magnitudes.
pub const DEFAULT_PRECISION: usize = 6;

/// One mil (a thousandth of an inch) in meters.
const MIL: f64 = 25.4e-6;

/// Suffixes tried when formatting, largest first.
///
/// The empty suffix keeps magnitudes in [1, 1000) unscaled.
const FORMAT_SUFFIXES: &[(&str, f64)] = &[
    ("T", 1e12),
    ("G", 1e9),
    ("Meg", 1e6),
    ("K", 1e3),
    ("", 1.0),
    ("mil", MIL),
    ("m", 1e-3),
    ("u", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
];

/// Tolerance, in mils, for recognizing a whole number of mils.
const MIL_TOLERANCE: f64 = 1e-9;

/// A magnitude as supplied by the caller: a number or a SPICE string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain numeric magnitude
    Number(f64),
    /// Pre-formatted magnitude, possibly with a metric suffix
    Text(String),
}

impl Value {
    /// Check whether this value counts as "not supplied".
    ///
    /// Numeric zero and the empty string are unset. A string spelling zero
    /// (`"0"`) is a real value, and so is a whitespace-only string, which
    /// then fails to normalize.
    pub fn is_unset(&self) -> bool {
        match self {
            Value::Number(n) => *n == 0.0,
            Value::Text(s) => s.is_empty(),
        }
    }

    /// Resolve the magnitude as a float.
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Ok(*n),
            Value::Number(n) => Err(NetlistError::invalid_value(
                n.to_string(),
                "magnitude must be finite",
            )),
            Value::Text(s) => parse_value(s),
        }
    }

    /// Render the canonical netlist form of this value.
    pub fn normalize(&self) -> Result<String> {
        format_value_with_precision(self, DEFAULT_PRECISION)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(value as f64)
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

value_from_int!(i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Look up the multiplier for a metric suffix.
fn suffix_multiplier(suffix: &str) -> Option<f64> {
    if suffix.eq_ignore_ascii_case("meg") {
        return Some(1e6);
    }
    if suffix.eq_ignore_ascii_case("mil") {
        return Some(MIL);
    }
    let mult = match suffix {
        "T" => 1e12,
        "G" => 1e9,
        "M" => 1e6,
        "K" | "k" => 1e3,
        "m" => 1e-3,
        "u" | "µ" => 1e-6,
        "n" => 1e-9,
        "p" => 1e-12,
        "f" => 1e-15,
        "a" => 1e-18,
        _ => return None,
    };
    Some(mult)
}

/// Length in bytes of the leading numeric part of `text`.
///
/// Accepts an optional sign, digits and dots, then an exponent only when at
/// least one digit follows the `e`.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > digits_start {
            i = j;
        }
    }

    i
}

/// Parse a magnitude string with an optional metric suffix.
pub fn parse_value(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(NetlistError::invalid_value(text, "empty magnitude"));
    }

    let (num_str, suffix) = trimmed.split_at(numeric_prefix_len(trimmed));
    let number: f64 = num_str
        .parse()
        .map_err(|_| NetlistError::invalid_value(trimmed, "expected a number"))?;

    let magnitude = if suffix.is_empty() {
        number
    } else {
        if !suffix.chars().all(char::is_alphabetic) {
            return Err(NetlistError::invalid_value(
                trimmed,
                format!("unexpected characters '{}'", suffix),
            ));
        }
        let mult = suffix_multiplier(suffix)
            .ok_or_else(|| NetlistError::unknown_suffix(suffix, trimmed))?;
        number * mult
    };

    if !magnitude.is_finite() {
        return Err(NetlistError::invalid_value(trimmed, "magnitude must be finite"));
    }
    Ok(magnitude)
}

/// Format a magnitude in canonical netlist form.
///
/// ```
/// use spice_elements::units::format_value;
///
/// assert_eq!(format_value(4700).unwrap(), "4.7K");
/// assert_eq!(format_value("1e6").unwrap(), "1Meg");
/// assert_eq!(format_value("0.5m").unwrap(), "500u");
/// ```
pub fn format_value(value: impl Into<Value>) -> Result<String> {
    format_value_with_precision(&value.into(), DEFAULT_PRECISION)
}

/// Format a magnitude with the given number of significant digits.
pub fn format_value_with_precision(value: &Value, precision: usize) -> Result<String> {
    let magnitude = value.to_f64()?;

    if magnitude == 0.0 {
        return Ok("0".to_string());
    }

    for &(suffix, factor) in FORMAT_SUFFIXES {
        let scaled = magnitude / factor;
        if !(1.0..1e3).contains(&scaled.abs()) {
            continue;
        }

        if suffix == "mil" {
            // Only exact multiples of a mil use the mil suffix
            let whole = scaled.round();
            if (scaled - whole).abs() < MIL_TOLERANCE {
                return Ok(format!("{}{}", whole as i64, suffix));
            }
            continue;
        }

        let rounded = round_to(scaled, precision);
        return Ok(format!("{}{}", format_general(rounded, precision), suffix));
    }

    Ok(format_general(magnitude, precision))
}

fn round_to(x: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (x * scale).round() / scale
}

/// Format a float like C's `%g`: `precision` significant digits, trailing
/// zeros stripped, scientific notation for very large or small exponents.
pub fn format_general(x: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return x.to_string();
    }

    // The exponent is taken after rounding to `precision` digits
    let sci = format!("{:.*e}", precision - 1, x);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
