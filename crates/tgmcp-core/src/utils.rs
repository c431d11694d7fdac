use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{errors::Error, Result};

/// Run an optional sub-fetch: success becomes `Some`, any failure becomes `None`.
///
/// Used for enrichment fields (description, pinned message, bio) whose loss is
/// not reported to the caller.
pub async fn best_effort<T, F>(what: &str, fut: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match fut.await {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("best-effort {what} skipped: {e}");
            None
        }
    }
}

/// Pretty JSON with non-ASCII preserved.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Parse `YYYY-MM-DD` as midnight UTC.
pub fn parse_day_utc(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        Error::invalid(format!(
            "{field}: time data '{raw}' does not match format 'YYYY-MM-DD' ({e})"
        ))
    })?;
    day.and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .ok_or_else(|| Error::invalid(format!("{field}: invalid date '{raw}'")))
}

// ============== Argument Helpers ==============

pub fn require<'a>(args: &'a Value, key: &str) -> Result<&'a Value> {
    match args.get(key) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(Error::invalid(format!("missing required argument: {key}"))),
    }
}

pub fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    require(args, key)?
        .as_str()
        .ok_or_else(|| Error::invalid(format!("{key} must be a string")))
}

pub fn require_i32(args: &Value, key: &str) -> Result<i32> {
    as_i32(key, require(args, key)?)
}

pub fn opt_i32(args: &Value, key: &str) -> Result<Option<i32>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => as_i32(key, v).map(Some),
    }
}

pub fn opt_str<'a>(args: &'a Value, key: &str) -> Result<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(Error::invalid(format!("{key} must be a string"))),
    }
}

/// Optional non-negative count with a default.
pub fn opt_limit(args: &Value, key: &str, default: usize) -> Result<usize> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| Error::invalid(format!("{key} must be a non-negative integer"))),
    }
}

fn as_i32(key: &str, v: &Value) -> Result<i32> {
    let n = match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    n.and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| Error::invalid(format!("{key} must be an integer")))
}
