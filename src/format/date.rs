use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt::Write;

use crate::model::lenient;

/// Fallback when a configured pattern is not a valid chrono format.
const ISO_DATE: &str = "%Y-%m-%d";
const ISO_DATETIME: &str = "%Y-%m-%d %H:%M";

pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", date.format(ISO_DATE));
    }
    out
}

pub fn format_datetime(dt: NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", dt.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", dt.format(ISO_DATETIME));
    }
    out
}

/// Format a date-like JSON value; unparseable input is shown verbatim.
pub fn format_date_value(value: &Value, pattern: &str) -> Option<String> {
    match lenient::date(value) {
        Some(date) => Some(format_date(date, pattern)),
        None => lenient::text(value),
    }
}

/// Format a date string; unparseable input is shown verbatim.
pub fn format_date_str(raw: &str, pattern: &str) -> String {
    lenient::parse_date(raw)
        .map(|d| format_date(d, pattern))
        .unwrap_or_else(|| raw.trim().to_string())
}
