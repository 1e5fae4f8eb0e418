//! Whole-taka amounts and lenient decoding of stored numbers.
//!
//! Stored documents were written by a dynamically typed client, so a numeric
//! field may be missing, `null`, a float, or a string. Reading never fails:
//! anything that is not a usable number becomes zero.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub type Amount = i64;

/// Coerce an arbitrary JSON value into an amount.
///
/// Floats are truncated toward zero, numeric strings are parsed, everything
/// else is 0.
pub fn coerce(value: &Value) -> Amount {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64() {
                from_f64(f)
            } else {
                // u64 beyond i64::MAX
                Amount::MAX
            }
        }
        Value::String(s) => coerce_str(s),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

fn coerce_str(s: &str) -> Amount {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return i;
    }
    trimmed.parse::<f64>().map(from_f64).unwrap_or(0)
}

fn from_f64(f: f64) -> Amount {
    if f.is_finite() {
        // `as` saturates at the i64 bounds
        f.trunc() as Amount
    } else {
        0
    }
}

/// Serde adapter for `#[serde(deserialize_with = "money::lenient")]`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce).unwrap_or(0))
}

/// Sum amounts without overflowing.
pub fn total<I>(amounts: I) -> Amount
where
    I: IntoIterator<Item = Amount>,
{
    amounts.into_iter().fold(0, Amount::saturating_add)
}

/// Format with thousands separators, e.g. `-12,500`.
pub fn format_amount(amount: Amount) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
