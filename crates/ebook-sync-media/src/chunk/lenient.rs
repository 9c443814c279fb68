//! Tolerant field decoders for backend listings.
//!
//! A malformed field decodes as absent instead of failing the whole listing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// String, or number rendered as a string. Blank strings are absent.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Integer, finite float (truncated), or numeric string.
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64))
}

/// `null` decodes as the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

/// Truncate a float toward zero, rejecting non-finite and out-of-range values.
pub fn truncate(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_i64")]
        n: Option<i64>,
        #[serde(default, deserialize_with = "opt_string")]
        s: Option<String>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_opt_i64_variants() {
        assert_eq!(probe(r#"{"n": 7}"#).n, Some(7));
        assert_eq!(probe(r#"{"n": 7.9}"#).n, Some(7));
        assert_eq!(probe(r#"{"n": -2.5}"#).n, Some(-2));
        assert_eq!(probe(r#"{"n": " 12 "}"#).n, Some(12));
        assert_eq!(probe(r#"{"n": "3.0"}"#).n, Some(3));
        assert_eq!(probe(r#"{"n": "abc"}"#).n, None);
        assert_eq!(probe(r#"{"n": null}"#).n, None);
        assert_eq!(probe(r#"{"n": [1]}"#).n, None);
        assert_eq!(probe(r#"{}"#).n, None);
    }

    #[test]
    fn test_opt_string_variants() {
        assert_eq!(probe(r#"{"s": "x"}"#).s.as_deref(), Some("x"));
        assert_eq!(probe(r#"{"s": 12}"#).s.as_deref(), Some("12"));
        assert_eq!(probe(r#"{"s": "  "}"#).s, None);
        assert_eq!(probe(r#"{"s": false}"#).s, None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate(5.99), Some(5));
        assert_eq!(truncate(f64::NAN), None);
        assert_eq!(truncate(f64::INFINITY), None);
        assert_eq!(truncate(1e300), None);
    }
}
