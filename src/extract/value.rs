//! Cell value types and text coercion
//!
//! Numbers on quote pages come in both German (`1.234,56`) and English
//! (`1,234.56`) notation; [`NumberFormat`] decides which separator is the
//! decimal one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Formats tried, in order, when no date formats are configured
pub const DEFAULT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Characters that only ever group digits
const GROUPING_CHARS: [char; 4] = [' ', '\u{a0}', '\u{202f}', '\''];

/// Target type of a header or value cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Integer,
    Float,
    #[default]
    Text,
    Date,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Text => "text",
            ValueType::Date => "date",
        })
    }
}

/// A decoded cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl CellValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            CellValue::Integer(_) => ValueType::Integer,
            CellValue::Float(_) => ValueType::Float,
            CellValue::Text(_) => ValueType::Text,
            CellValue::Date(_) => ValueType::Date,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Date(d) => write!(f, "{}", d),
        }
    }
}

/// Which character separates the fractional part of a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// Guess per cell: with both `.` and `,` present the rightmost one is
    /// decimal; a separator occurring once is decimal, several times grouping
    #[default]
    Auto,
    /// `1,234.56`
    Point,
    /// `1.234,56`
    Comma,
}

/// Cell text that does not read as the requested type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read `{text}` as {expected}")]
pub struct CoercionError {
    pub text: String,
    pub expected: ValueType,
}

/// Convert cell text to `value_type`.
///
/// The text is trimmed first; empty text never coerces. An empty
/// `date_formats` falls back to [`DEFAULT_DATE_FORMATS`].
pub fn coerce(
    text: &str,
    value_type: ValueType,
    number_format: NumberFormat,
    date_formats: &[String],
) -> Result<CellValue, CoercionError> {
    let trimmed = text.trim();
    let value = if trimmed.is_empty() {
        None
    } else {
        match value_type {
            ValueType::Integer => parse_integer(trimmed, number_format).map(CellValue::Integer),
            ValueType::Float => parse_float(trimmed, number_format).map(CellValue::Float),
            ValueType::Text => Some(CellValue::Text(trimmed.to_string())),
            ValueType::Date => parse_date(trimmed, date_formats).map(CellValue::Date),
        }
    };
    value.ok_or_else(|| CoercionError {
        text: text.to_string(),
        expected: value_type,
    })
}

/// Whole number, with optional sign and grouping separators.
///
/// In `Auto` mode a single separator followed by exactly three digits is read
/// as grouping (`1.000` is one thousand).
pub fn parse_integer(text: &str, format: NumberFormat) -> Option<i64> {
    let number = split_number(text, format)?;
    let digits = match number.fraction {
        None => number.integer,
        Some(fraction)
            if format == NumberFormat::Auto && number.separators == 1 && fraction.len() == 3 =>
        {
            number.integer + &fraction
        }
        Some(_) => return None,
    };
    let magnitude: i64 = digits.parse().ok()?;
    Some(if number.negative { -magnitude } else { magnitude })
}

/// Decimal number, with optional sign and grouping separators
pub fn parse_float(text: &str, format: NumberFormat) -> Option<f64> {
    let number = split_number(text, format)?;
    let mut canonical = String::with_capacity(text.len() + 2);
    if number.negative {
        canonical.push('-');
    }
    canonical.push_str(&number.integer);
    if let Some(fraction) = number.fraction {
        canonical.push('.');
        canonical.push_str(&fraction);
    }
    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// First format in `formats` (or the defaults) that reads `text`
pub fn parse_date(text: &str, formats: &[String]) -> Option<NaiveDate> {
    if formats.is_empty() {
        DEFAULT_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    } else {
        formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    }
}

/// Sign, integer digits and fraction digits of a number
#[derive(Debug, PartialEq)]
struct SplitNumber {
    negative: bool,
    integer: String,
    fraction: Option<String>,
    /// `.`/`,` characters seen
    separators: usize,
}

fn split_number(text: &str, format: NumberFormat) -> Option<SplitNumber> {
    let mut chars = text.chars().peekable();
    let negative = match chars.peek() {
        Some('-' | '\u{2212}') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };
    let body: String = chars.filter(|c| !GROUPING_CHARS.contains(c)).collect();
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let dots = body.matches('.').count();
    let commas = body.matches(',').count();
    let decimal = match format {
        NumberFormat::Point => Some('.'),
        NumberFormat::Comma => Some(','),
        NumberFormat::Auto => match (dots, commas) {
            (0, 0) => None,
            (d, 0) => (d == 1).then_some('.'),
            (0, c) => (c == 1).then_some(','),
            _ => {
                let last_dot = body.rfind('.');
                let last_comma = body.rfind(',');
                if last_dot > last_comma {
                    Some('.')
                } else {
                    Some(',')
                }
            }
        },
    };

    let (integer_part, fraction) = match decimal.and_then(|sep| body.split_once(sep)) {
        Some((integer, fraction)) => {
            if !fraction.chars().all(|c| c.is_ascii_digit()) || fraction.is_empty() {
                return None;
            }
            (integer, Some(fraction.to_string()))
        }
        None => (body.as_str(), None),
    };

    // Whatever separators remain before the decimal point are grouping
    let integer: String = integer_part.chars().filter(char::is_ascii_digit).collect();
    if integer.is_empty() && fraction.is_none() {
        return None;
    }
    if integer_part.starts_with(|c: char| c == '.' || c == ',') && fraction.is_none() {
        return None;
    }

    Some(SplitNumber {
        negative,
        integer: if integer.is_empty() {
            "0".to_string()
        } else {
            integer
        },
        fraction,
        separators: dots + commas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(text: &str) -> Option<f64> {
        parse_float(text, NumberFormat::Auto)
    }

    #[test]
    fn test_float_auto() {
        assert_eq!(float("2,78"), Some(2.78));
        assert_eq!(float("3.30"), Some(3.30));
        assert_eq!(float("1.234,56"), Some(1234.56));
        assert_eq!(float("1,234.56"), Some(1234.56));
        assert_eq!(float("1.234.567"), Some(1234567.0));
        assert_eq!(float("1 234,5"), Some(1234.5));
        assert_eq!(float("1\u{a0}234,5"), Some(1234.5));
        assert_eq!(float("-0,45"), Some(-0.45));
        assert_eq!(float("\u{2212}1,5"), Some(-1.5));
        assert_eq!(float("+7"), Some(7.0));
        assert_eq!(float(",5"), Some(0.5));
    }

    #[test]
    fn test_float_rejects() {
        for bad in ["", "-", "n/a", "12%", "1,2,3.4.5,6", "1,", "3,00 EUR", "--1", "1e5"] {
            assert_eq!(float(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_float_fixed_formats() {
        assert_eq!(parse_float("1,234.5", NumberFormat::Point), Some(1234.5));
        assert_eq!(parse_float("1.234,5", NumberFormat::Comma), Some(1234.5));
        assert_eq!(parse_float("1.234", NumberFormat::Comma), Some(1234.0));
        assert_eq!(parse_float("1.234", NumberFormat::Point), Some(1.234));
        assert_eq!(parse_float("1.2.3", NumberFormat::Point), None);
        assert_eq!(parse_float("1,5,5", NumberFormat::Comma), None);
    }

    #[test]
    fn test_integer() {
        assert_eq!(parse_integer("2001", NumberFormat::Auto), Some(2001));
        assert_eq!(parse_integer("-12", NumberFormat::Auto), Some(-12));
        assert_eq!(parse_integer("1.000", NumberFormat::Auto), Some(1000));
        assert_eq!(parse_integer("1.000.000", NumberFormat::Auto), Some(1_000_000));
        assert_eq!(parse_integer("1'000", NumberFormat::Auto), Some(1000));
        assert_eq!(parse_integer("2,78", NumberFormat::Auto), None);
        assert_eq!(parse_integer("1.000", NumberFormat::Point), None);
        assert_eq!(parse_integer("1,000", NumberFormat::Point), Some(1000));
        assert_eq!(parse_integer("99999999999999999999", NumberFormat::Auto), None);
    }

    #[test]
    fn test_date() {
        let expected = NaiveDate::from_ymd_opt(2006, 3, 31);
        assert_eq!(parse_date("2006-03-31", &[]), expected);
        assert_eq!(parse_date("31.03.2006", &[]), expected);
        assert_eq!(parse_date("03/31/2006", &[]), expected);
        assert_eq!(parse_date("31/03/2006", &["%d/%m/%Y".to_string()]), expected);
        assert_eq!(parse_date("2006-03-31", &["%d/%m/%Y".to_string()]), None);
        assert_eq!(parse_date("Q1 2006", &[]), None);
    }

    #[test]
    fn test_coerce() {
        let formats: Vec<String> = Vec::new();
        assert_eq!(
            coerce(" 2,78 ", ValueType::Float, NumberFormat::Auto, &formats),
            Ok(CellValue::Float(2.78))
        );
        assert_eq!(
            coerce("EPS", ValueType::Text, NumberFormat::Auto, &formats),
            Ok(CellValue::Text("EPS".to_string()))
        );
        assert_eq!(
            coerce("  ", ValueType::Text, NumberFormat::Auto, &formats),
            Err(CoercionError {
                text: "  ".to_string(),
                expected: ValueType::Text
            })
        );
        let err = coerce("n/a", ValueType::Integer, NumberFormat::Auto, &formats)
            .expect_err("not a number");
        assert_eq!(err.to_string(), "cannot read `n/a` as integer");
    }

    #[test]
    fn test_cell_value_accessors() {
        assert_eq!(CellValue::Integer(2001).as_f64(), Some(2001.0));
        assert_eq!(CellValue::Integer(2001).value_type(), ValueType::Integer);
        assert_eq!(CellValue::Float(2.5).as_i64(), None);
        assert_eq!(CellValue::Text("x".into()).as_str(), Some("x"));
        let date = NaiveDate::from_ymd_opt(2006, 1, 2).expect("date");
        assert_eq!(CellValue::Date(date).to_string(), "2006-01-02");
        assert_eq!(CellValue::Date(date).as_date(), Some(date));
    }
}
