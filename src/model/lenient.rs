//! Tolerant conversions from loosely typed JSON values.
//!
//! Report payloads are produced by data providers that are not always
//! consistent about types: amounts arrive as numbers or strings, codes as
//! numbers, missing arrays as `null`. These helpers accept all of those and
//! are used both directly and as `deserialize_with` adapters.

use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

use super::{LogoBuffer, Row};

/// Read a decimal from a JSON number or numeric string.
///
/// Strings may carry thousands separators and a leading or trailing
/// currency code (`"AED 1,250.00"`).
pub fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(d) = Decimal::from_str(&cleaned) {
        return Some(d);
    }
    if let Ok(d) = Decimal::from_scientific(&cleaned) {
        return Some(d);
    }
    let stripped = cleaned.trim_matches(|c: char| c.is_alphabetic() || c == '$' || c == '%');
    if stripped.is_empty() || stripped == cleaned {
        return None;
    }
    Decimal::from_str(stripped).ok()
}

/// Render a scalar (or an array of scalars) as display text.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Object(map) => ["name", "label", "title"]
            .iter()
            .find_map(|k| map.get(*k).and_then(text)),
    }
}

/// Parse a calendar date from the formats data providers emit.
pub fn date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        // Epoch milliseconds.
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<chrono::Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

const DATE_PATTERNS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d %b %Y", "%b %d, %Y"];
const DATETIME_PATTERNS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(dt) = parse_datetime(s) {
        return Some(dt.date());
    }
    DATE_PATTERNS
        .iter()
        .find_map(|p| NaiveDate::parse_from_str(s, p).ok())
}

pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_PATTERNS
        .iter()
        .find_map(|p| NaiveDateTime::parse_from_str(s, p).ok())
}

/// A non-negative whole number from a JSON number or numeric string.
pub fn whole(value: &Value) -> Option<u32> {
    decimal(value)
        .filter(|d| !d.is_sign_negative() && d.fract().is_zero())
        .and_then(|d| d.to_u32())
}

/// Binary data in any of the shapes providers send: an array of bytes, a
/// Node `{"type": "Buffer", "data": [...]}` object, or base64 text
/// (optionally a `data:` URI).
pub fn bytes(value: &Value) -> std::result::Result<Vec<u8>, String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| format!("logo buffer holds a non-byte value: {item}"))
            })
            .collect(),
        Value::Object(map) => match map.get("data") {
            Some(data @ Value::Array(_)) => bytes(data),
            _ => Err("logo buffer object has no `data` byte array".into()),
        },
        Value::String(s) => {
            let encoded = match s.split_once(";base64,") {
                Some((prefix, rest)) if prefix.starts_with("data:") => rest,
                _ => s.as_str(),
            };
            let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| format!("logo buffer is not valid base64: {e}"))
        }
        other => Err(format!("logo buffer must be bytes, a Buffer object or base64 text, not {other}")),
    }
}

/// First non-null value among `keys`.
pub fn field<'a>(row: &'a Row, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .find(|v| !v.is_null())
}

pub fn field_decimal(row: &Row, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|k| row.get(*k).and_then(decimal))
}

pub fn field_text(row: &Row, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| row.get(*k).and_then(text))
        .filter(|s| !s.trim().is_empty())
}

pub fn field_date(row: &Row, keys: &[&str]) -> Option<NaiveDate> {
    keys.iter().find_map(|k| row.get(*k).and_then(date))
}

// serde adapters

pub fn de_decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(decimal(&v).unwrap_or_default())
}

pub fn de_opt_decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(decimal(&v))
}

pub fn de_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(text(&v).unwrap_or_default())
}

pub fn de_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(text(&v).filter(|s| !s.trim().is_empty()))
}

pub fn de_opt_whole<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(whole(&v))
}

/// A value that does not decode falls back to its default.
pub fn de_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).unwrap_or_default())
}

/// An optional nested object; one that does not decode is treated as absent.
pub fn de_opt_item<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    if v.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(v).ok())
}

/// Inline logo data. Unreadable shapes are kept, with the reason, so the
/// logo step reports them instead of the whole payload failing.
pub fn de_opt_logo_buffer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<LogoBuffer>, D::Error> {
    let v = Value::deserialize(d)?;
    if v.is_null() {
        return Ok(None);
    }
    Ok(Some(match bytes(&v) {
        Ok(data) => LogoBuffer::Bytes(data),
        Err(reason) => {
            warn!("{reason}");
            LogoBuffer::Unreadable(reason)
        }
    }))
}

/// An optional array of row objects; `null` is absent, non-object items are dropped.
pub fn de_opt_rows<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Row>>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(rows(v))
}

pub fn rows(value: Value) -> Option<Vec<Row>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

/// An optional array of typed items; items that fail to decode are dropped.
pub fn de_opt_items<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn decimals_from_numbers_and_strings() {
        assert_eq!(decimal(&json!(12.345)), Some(dec!(12.345)));
        assert_eq!(decimal(&json!(100)), Some(dec!(100)));
        assert_eq!(decimal(&json!("1,250.50")), Some(dec!(1250.50)));
        assert_eq!(decimal(&json!("AED 99.10")), Some(dec!(99.10)));
        assert_eq!(decimal(&json!("-5")), Some(dec!(-5)));
        assert_eq!(decimal(&json!("n/a")), None);
        assert_eq!(decimal(&json!(null)), None);
        assert_eq!(decimal(&json!(true)), None);
    }

    #[test]
    fn text_from_scalars_and_arrays() {
        assert_eq!(text(&json!("x")), Some("x".to_string()));
        assert_eq!(text(&json!(1000)), Some("1000".to_string()));
        assert_eq!(text(&json!(["a", "b"])), Some("a, b".to_string()));
        assert_eq!(text(&json!({"name": "Travel"})), Some("Travel".to_string()));
        assert_eq!(text(&json!(null)), None);
    }

    #[test]
    fn dates_in_common_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(date(&json!("2024-03-15")), Some(expected));
        assert_eq!(date(&json!("2024-03-15T10:30:00.000Z")), Some(expected));
        assert_eq!(date(&json!("15/03/2024")), Some(expected));
        assert_eq!(date(&json!("not a date")), None);
    }

    #[test]
    fn rows_drop_non_objects() {
        let parsed = rows(json!([{"a": 1}, 3, "x", {"b": 2}])).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(rows(json!(null)).is_none());
    }

    #[test]
    fn whole_numbers_from_numbers_and_strings() {
        assert_eq!(whole(&json!(2)), Some(2));
        assert_eq!(whole(&json!("3")), Some(3));
        assert_eq!(whole(&json!(-1)), None);
        assert_eq!(whole(&json!(2.5)), None);
        assert_eq!(whole(&json!("two")), None);
    }

    #[test]
    fn bytes_in_every_provider_shape() {
        let png_magic = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(bytes(&json!([137, 80, 78, 71, 13, 10, 26, 10])).unwrap(), png_magic);
        assert_eq!(
            bytes(&json!({"type": "Buffer", "data": [137, 80, 78, 71, 13, 10, 26, 10]})).unwrap(),
            png_magic
        );
        assert_eq!(bytes(&json!("iVBORw0KGgo=")).unwrap(), png_magic);
        assert_eq!(bytes(&json!("data:image/png;base64,iVBORw0KGgo=")).unwrap(), png_magic);
    }

    #[test]
    fn unreadable_bytes_explain_why() {
        assert!(bytes(&json!([1, 256])).unwrap_err().contains("non-byte"));
        assert!(bytes(&json!({"type": "Buffer"})).unwrap_err().contains("data"));
        assert!(bytes(&json!("not base64!")).unwrap_err().contains("base64"));
        assert!(bytes(&json!(42)).is_err());
    }
}
