//! Reusable field filters
//!
//! These filters transform field values before validation

use anyhow::{Result, anyhow};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Number, Value, json};
use std::str::FromStr;

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: treat an empty (or blank) string as an absent value
///
/// Form inputs submit `""` for untouched optional number fields.
pub fn empty_to_null() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value.as_str() {
        Some(s) if s.trim().is_empty() => Ok(Value::Null),
        _ => Ok(value),
    }
}

/// Filter: convert numeric strings into JSON numbers
///
/// Strings that do not parse are left as they are so the `number`
/// validator can report them.
pub fn coerce_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        let Some(s) = value.as_str() else {
            return Ok(value);
        };
        let s = s.trim();

        if let Ok(i) = s.parse::<i64>() {
            return Ok(json!(i));
        }
        match s.parse::<f64>() {
            Ok(f) => Ok(Number::from_f64(f).map(Value::Number).unwrap_or(value)),
            Err(_) => Ok(value),
        }
    }
}

/// Filter: turn a float without a fractional part (`3.0`) into an integer
pub fn whole_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value.as_f64() {
        Some(f)
            if !(value.is_i64() || value.is_u64())
                && f.fract() == 0.0
                && f.abs() < i64::MAX as f64 =>
        {
            Ok(json!(f as i64))
        }
        _ => Ok(value),
    }
}

/// Filter: round number to specified decimal places
///
/// Rounds in decimal arithmetic, half away from zero, so `1.005` becomes
/// `1.01` rather than the `1.0` binary floating point would give.
pub fn round_decimals(
    decimals: u32,
) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    move |field: &str, value: Value| {
        let Some(num) = value.as_f64() else {
            return Ok(value);
        };
        if value.is_i64() || value.is_u64() {
            return Ok(value);
        }

        let exact = Decimal::from_str(&num.to_string())
            .map_err(|e| anyhow!("'{}' is not a representable number: {}", field, e))?;
        let rounded = exact
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .ok_or_else(|| anyhow!("'{}' is out of range", field))?;

        Ok(json!(rounded))
    }
}
