//! JSON text written the way the page script's `JSON.stringify` writes it
//!
//! The document is toggled in two places: here, and by the behavior module
//! embedded in the HTML page. Both must produce the same characters for the
//! same value, so numbers use ECMAScript formatting and object keys follow
//! ECMAScript property order.

use std::io;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};
use serde_json::{Map, Value};

/// Largest integer a double represents exactly
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Compact single-line form
pub(crate) fn to_compact(value: &Value) -> Option<String> {
    write(value, CompactFormatter)
}

/// Indented multi-line form
pub(crate) fn to_pretty(value: &Value, indent: &str) -> Option<String> {
    write(value, PrettyFormatter::with_indent(indent.as_bytes()))
}

fn write<F: Formatter>(value: &Value, formatter: F) -> Option<String> {
    let ordered = script_order(value);
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, ScriptNumbers(formatter));
    ordered.serialize(&mut ser).ok()?;
    String::from_utf8(buf).ok()
}

/// Array-index keys first in ascending order, then the rest in insertion order
fn script_order(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(script_order).collect()),
        Value::Object(map) => {
            let mut indexed = Vec::new();
            let mut named = Vec::new();
            for (key, item) in map {
                match array_index(key) {
                    Some(index) => indexed.push((index, key, item)),
                    None => named.push((key, item)),
                }
            }
            indexed.sort_by_key(|(index, ..)| *index);

            let mut out = Map::new();
            for (_, key, item) in indexed {
                out.insert(key.clone(), script_order(item));
            }
            for (key, item) in named {
                out.insert(key.clone(), script_order(item));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Canonical decimal below 2^32 - 1, e.g. "7" but not "07" or "+7"
fn array_index(key: &str) -> Option<u32> {
    let index: u32 = key.parse().ok()?;
    (index != u32::MAX && index.to_string() == key).then_some(index)
}

/// Number to text as ECMAScript `Number.prototype.toString` does
pub(crate) fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    // Shortest round-trip digits, d.ddde<exp>
    let scientific = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{sign}{scientific}");
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return format!("{sign}{scientific}");
    };

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(n.unsigned_abs() as usize))
    } else {
        let exp_sign = if n - 1 < 0 { '-' } else { '+' };
        let exp = (n - 1).unsigned_abs();
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{exp_sign}{exp}")
        } else {
            format!("{first}.{rest}e{exp_sign}{exp}")
        }
    };
    format!("{sign}{body}")
}

/// Wraps a formatter, replacing only how numbers are written
struct ScriptNumbers<F>(F);

impl<F: Formatter> Formatter for ScriptNumbers<F> {
    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(format_number(value).as_bytes())
    }

    fn write_u64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: u64) -> io::Result<()> {
        if value > MAX_SAFE_INTEGER {
            return self.write_f64(writer, value as f64);
        }
        self.0.write_u64(writer, value)
    }

    fn write_i64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: i64) -> io::Result<()> {
        if value.unsigned_abs() > MAX_SAFE_INTEGER {
            return self.write_f64(writer, value as f64);
        }
        self.0.write_i64(writer, value)
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(text: &str) -> String {
        let value: Value = serde_json::from_str(text).unwrap();
        to_compact(&value).unwrap()
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(1e5), "100000");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.7976931348623157e308), "1.7976931348623157e+308");
    }

    #[test]
    fn test_compact_matches_browser_output() {
        assert_eq!(compact(r#"{"a":1.0,"b":1e5}"#), r#"{"a":1,"b":100000}"#);
        assert_eq!(compact("[2.50, -0.0, 1E-7, 12]"), "[2.5,0,1e-7,12]");
    }

    #[test]
    fn test_unsafe_integers_round_like_doubles() {
        assert_eq!(compact("9007199254740993"), "9007199254740992");
        assert_eq!(compact("-9007199254740993"), "-9007199254740992");
        assert_eq!(compact("9007199254740991"), "9007199254740991");
    }

    #[test]
    fn test_index_keys_come_first() {
        assert_eq!(
            compact(r#"{"b":1,"2":2,"a":{"10":0,"x":0,"1":0},"1":3,"01":4}"#),
            r#"{"1":3,"2":2,"b":1,"a":{"1":0,"10":0,"x":0},"01":4}"#
        );
    }

    #[test]
    fn test_pretty_uses_same_numbers() {
        let value: Value = serde_json::from_str(r#"{"n":[1.0]}"#).unwrap();
        assert_eq!(to_pretty(&value, "  ").unwrap(), "{\n  \"n\": [\n    1\n  ]\n}");
    }
}
