//! Best-effort conversion of a token into a typed value.

use std::fmt;

/// The most specific value a token could be read as.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Short name of the variant, handy for echoing types back to the user.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

// Shortest round-trip digits; exponent form below 1e-4 and from 1e16 up,
// with a signed exponent of at least two digits (`1e+20`, `1e-05`).
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    let repr = format!("{x:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Removes `_` digit separators. `None` if one is not between two digits.
fn strip_digit_separators(number: &str) -> Option<String> {
    let bytes = number.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| bytes.get(j));
        let after = bytes.get(i + 1);
        let between_digits = before.is_some_and(u8::is_ascii_digit)
            && after.is_some_and(u8::is_ascii_digit);
        if !between_digits {
            return None;
        }
    }
    Some(number.replace('_', ""))
}

/// Converts a token to the first matching type: null, bool, integer, float,
/// and otherwise the original string. Never fails.
///
/// Numbers may be padded with whitespace and may group digits with single
/// underscores (`1_000`). Integers that do not fit in an `i64` fall through
/// to the float parse. The `Str` fallback keeps the token untouched.
pub fn convert_type(token: &str) -> Value {
    if token.eq_ignore_ascii_case("none") {
        return Value::Null;
    }
    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Some(number) = strip_digit_separators(token.trim()) {
        if let Ok(i) = number.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(x) = number.parse::<f64>() {
            return Value::Float(x);
        }
    }
    Value::Str(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_precedence() {
        assert_eq!(convert_type("True"), Value::Bool(true));
        assert_eq!(convert_type("FALSE"), Value::Bool(false));
        assert_eq!(convert_type("none"), Value::Null);
        assert_eq!(convert_type("NoNe"), Value::Null);
        assert_eq!(convert_type("42"), Value::Int(42));
        assert_eq!(convert_type("-7"), Value::Int(-7));
        assert_eq!(convert_type("3.14"), Value::Float(3.14));
        assert_eq!(convert_type("hello"), Value::Str("hello".to_string()));
    }

    #[test]
    fn test_integer_overflow_reads_as_float() {
        assert_eq!(
            convert_type("123456789012345678901234567890"),
            Value::Float(123456789012345678901234567890.0)
        );
    }

    #[test]
    fn test_padded_and_grouped_numbers() {
        assert_eq!(convert_type(" 42 "), Value::Int(42));
        assert_eq!(convert_type("1_000"), Value::Int(1000));
        assert_eq!(convert_type(" 2.5"), Value::Float(2.5));
        assert_eq!(convert_type("1_000.5"), Value::Float(1000.5));
        assert_eq!(convert_type("1__0"), Value::Str("1__0".to_string()));
        assert_eq!(convert_type("_1"), Value::Str("_1".to_string()));
        assert_eq!(convert_type("1_"), Value::Str("1_".to_string()));
        assert_eq!(convert_type("  "), Value::Str("  ".to_string()));
        assert_eq!(convert_type(" x "), Value::Str(" x ".to_string()));
    }

    #[test]
    fn test_float_exponent_display() {
        assert_eq!(Value::Float(1e20).to_string(), "1e+20");
        assert_eq!(Value::Float(1.5e16).to_string(), "1.5e+16");
        assert_eq!(Value::Float(1e-5).to_string(), "1e-05");
        assert_eq!(Value::Float(-2.5e-7).to_string(), "-2.5e-07");
        assert_eq!(Value::Float(1e100).to_string(), "1e+100");
        assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Value::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Value::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn test_display() {
        assert_eq!(convert_type("2.0").to_string(), "2.0");
        assert_eq!(convert_type("none").to_string(), "None");
        assert_eq!(convert_type("true").type_name(), "bool");
    }
}
