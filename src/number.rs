use std::fmt;

use num_traits::ToPrimitive;

/// The payload of a numeric node.
#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Number {
    Integer(i64),
    Real(f64),
    Rational(i64, i64),

    /// A mantissa and a power of ten, kept apart so that they are written back the way they were
    /// read.
    ENotation(f64, i64),
}

impl Number {
    pub fn value(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Real(r) => r,
            Number::Rational(n, d) => n as f64 / d as f64,
            Number::ENotation(m, e) => scale(m, e),
        }
    }

    /// Only a real can be the `<notanumber/>` sentinel. A rational like 0/0 stays a rational
    /// even though its value is NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self, Number::Real(r) if r.is_nan())
    }

    pub fn is_infinity(&self) -> bool {
        *self == Number::Real(f64::INFINITY)
    }

    pub fn is_negative_infinity(&self) -> bool {
        *self == Number::Real(f64::NEG_INFINITY)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Real(r) => write!(f, "{}", format_general(*r, REAL_PRECISION)),
            Number::Rational(n, d) => write!(f, "{}/{}", n, d),
            Number::ENotation(m, e) => write!(f, "{}e{}", format_general(*m, REAL_PRECISION), e),
        }
    }
}

/// Significant digits used whenever a floating value is written out.
pub const REAL_PRECISION: usize = 15;

/// Why the text of a `<cn>` element could not be turned into a `Number`.
#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum NumberError {
    #[error("'{0}' is not a finite real number")]
    Real(String),

    #[error("'{0}' is not an integer in the 32-bit range")]
    Integer(String),

    #[error("'{0}' is not a valid e-notation number")]
    ENotation(String),

    #[error("'{0}' is not a valid rational number")]
    Rational(String),

    #[error("'{0}' is not a recognised number type")]
    UnsupportedType(String),
}

/// Decodes the content of a `<cn>` element. `kind` is its `type` attribute, `first` is the text
/// before any `<sep/>` and `second` the text after it.
pub fn decode(kind: &str, first: &str, second: Option<&str>) -> Result<Number, NumberError> {
    match kind {
        "real" => {
            let value = parse_finite(first).ok_or_else(|| NumberError::Real(first.trim().to_string()))?;
            Ok(Number::Real(value))
        }

        "integer" => {
            let value = parse_i32(first).ok_or_else(|| NumberError::Integer(first.trim().to_string()))?;
            Ok(Number::Integer(value))
        }

        "rational" => {
            let invalid = || NumberError::Rational(joined(first, second));
            let numerator = parse_i32(first).ok_or_else(invalid)?;
            let denominator = match second {
                Some(text) => parse_i32(text).ok_or_else(invalid)?,
                None => 1,
            };
            Ok(Number::Rational(numerator, denominator))
        }

        "e-notation" => {
            let invalid = || NumberError::ENotation(joined(first, second));

            // A mantissa like "1.5e3" contributes its own exponent
            let (mantissa_text, embedded) = match first.trim().find(|c: char| c == 'e' || c == 'E') {
                Some(index) => {
                    let trimmed = first.trim();
                    let embedded = trimmed[index + 1..].parse::<i64>().map_err(|_| invalid())?;
                    (&trimmed[..index], embedded)
                }
                None => (first, 0),
            };
            let mantissa = parse_finite(mantissa_text).ok_or_else(invalid)?;
            let explicit = match second {
                Some(text) => text.trim().parse::<i64>().map_err(|_| invalid())?,
                None => 0,
            };
            let exponent = explicit.checked_add(embedded).ok_or_else(invalid)?;

            if !scale(mantissa, exponent).is_finite() {
                return Err(invalid());
            }
            Ok(Number::ENotation(mantissa, exponent))
        }

        other => Err(NumberError::UnsupportedType(other.to_string())),
    }
}

fn joined(first: &str, second: Option<&str>) -> String {
    match second {
        Some(second) => format!("{} <sep/> {}", first.trim(), second.trim()),
        None => first.trim().to_string(),
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_i32(text: &str) -> Option<i64> {
    let wide = text.trim().parse::<i64>().ok()?;
    wide.to_i32().map(i64::from)
}

fn scale(mantissa: f64, exponent: i64) -> f64 {
    // Going through text avoids the rounding of repeated multiplication
    format!("{}e{}", mantissa, exponent).parse::<f64>().unwrap_or(f64::NAN)
}

/// Whether `units` is a syntactically valid unit identifier: a letter or underscore followed by
/// letters, digits and underscores.
pub fn is_valid_unit_sid(units: &str) -> bool {
    let mut chars = units.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => (),
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Formats `value` like C's `%.*g`: `precision` significant digits, trailing zeros removed, and
/// an exponent of at least two digits when the value is very large or very small.
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_fraction_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        strip_fraction_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_fraction_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Splits the `%.15g` text of `value` into its mantissa text and exponent, if the formatted text
/// needed an exponent at all.
pub fn split_exponent(value: f64) -> (String, Option<i64>) {
    let text = format_general(value, REAL_PRECISION);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent = exponent.parse::<i64>().unwrap_or(0);
            (mantissa.to_string(), Some(exponent))
        }
        None => (text, None),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(12345.7, 15), "12345.7");
        assert_eq!(format_general(0.1, 15), "0.1");
        assert_eq!(format_general(100.0, 15), "100");
        assert_eq!(format_general(-2.5, 15), "-2.5");
        assert_eq!(format_general(1e20, 15), "1e+20");
        assert_eq!(format_general(1.5e-7, 15), "1.5e-07");
        assert_eq!(format_general(0.0001, 15), "0.0001");
        assert_eq!(format_general(123456789012345678.0, 15), "1.23456789012346e+17");
    }

    #[test]
    fn test_split_exponent() {
        assert_eq!(split_exponent(3.25), ("3.25".to_string(), None));
        assert_eq!(split_exponent(2e30), ("2".to_string(), Some(30)));
        assert_eq!(split_exponent(-4.5e-9), ("-4.5".to_string(), Some(-9)));
    }
}
