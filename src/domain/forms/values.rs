//! Value helpers shared by the session, validation and rendering

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

use super::schema::FieldKind;

/// Flat mapping from field name to value
pub type FormValues = Map<String, Value>;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

pub fn is_email(value: &str) -> bool {
    email_regex().map_or(false, |re| re.is_match(value))
}

/// Null, blank strings and empty arrays count as "not provided".
/// `false` and `0` are real answers (e.g. an "Available: No" select).
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Calendar date as written. Timestamps keep the date of their own offset.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|naive| naive.date())
        })
}

/// Finite numbers only; `NaN`, `inf` and overflowing text are not numbers
pub fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

fn number_value(f: f64) -> Option<Value> {
    // keep integers integral
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        Some(Value::from(f as i64))
    } else {
        serde_json::Number::from_f64(f).map(Value::Number)
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Compiled field pattern, cached by source text. `None` for an invalid
/// pattern, which is logged once.
pub fn pattern_regex(pattern: &str) -> Option<Regex> {
    static PATTERNS: OnceLock<RwLock<HashMap<String, Option<Regex>>>> = OnceLock::new();
    let cache = PATTERNS.get_or_init(Default::default);

    if let Some(compiled) = cache.read().get(pattern) {
        return compiled.clone();
    }
    let compiled = Regex::new(pattern)
        .map_err(|e| tracing::warn!(pattern = %pattern, error = %e, "Ignoring invalid field pattern"))
        .ok();
    cache.write().insert(pattern.to_string(), compiled.clone());
    compiled
}

/// Whether a non-empty value is well formed for its kind
pub fn is_well_formed(kind: FieldKind, value: &Value) -> bool {
    match kind {
        FieldKind::Number => parse_number(value).is_some(),
        FieldKind::Date => value.as_str().map_or(false, |s| parse_date(s).is_some()),
        FieldKind::Datetime => value.as_str().map_or(false, |s| parse_datetime(s).is_some()),
        _ => true,
    }
}

/// Committed form of a value as it appears in the submission payload.
/// Dates become ISO-8601 strings, numeric text becomes a number and emails
/// lose surrounding blanks; anything that cannot be converted is passed
/// through untouched.
pub fn commit(kind: FieldKind, value: &Value) -> Value {
    if is_empty(value) {
        return value.clone();
    }
    let committed = match (kind, value) {
        (FieldKind::Date, Value::String(s)) => {
            parse_date(s).map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
        }
        (FieldKind::Datetime, Value::String(s)) => parse_datetime(s)
            .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true))),
        (FieldKind::Number, Value::String(_)) => parse_number(value).and_then(number_value),
        (FieldKind::Email, Value::String(s)) => Some(Value::String(s.trim().to_string())),
        _ => None,
    };
    committed.unwrap_or_else(|| value.clone())
}
