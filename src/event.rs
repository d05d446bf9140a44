//! Parsed input records and dotted-path field selection
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::error::{Result, StatsError};

/// Trait for records that support dotted-path selection
pub trait Selector {
    /// Select the value reached by following `path`, or `None` when any
    /// segment is missing or a non-final segment is not an object
    fn select(&self, path: &FieldPath) -> Option<&JsonValue>;

    /// Select by an unparsed dotted key. Malformed keys resolve to `None`.
    fn select_key(&self, key: &str) -> Option<&JsonValue>;
}

/// A pre-split dotted field path such as `req.timers.getMetadata`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path, rejecting empty paths and empty segments
    pub fn parse(raw: &str) -> Result<Self> {
        if let Some(reason) = malformed_reason(raw) {
            return Err(StatsError::InvalidFieldPath {
                path: raw.to_string(),
                reason,
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            segments: raw.split('.').map(str::to_owned).collect(),
        })
    }

    /// The path exactly as configured
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Individual key segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = StatsError;

    fn try_from(raw: String) -> Result<Self> {
        FieldPath::parse(&raw)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.raw
    }
}

fn malformed_reason(key: &str) -> Option<&'static str> {
    if key.is_empty() {
        Some("path is empty")
    } else if key.starts_with('.') || key.ends_with('.') {
        Some("path starts or ends with '.'")
    } else if key.contains("..") {
        Some("path contains an empty segment")
    } else {
        None
    }
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    data: JsonValue,
}

impl Record {
    /// Wrap an already parsed JSON value
    pub fn new(data: JsonValue) -> Self {
        Self { data }
    }

    /// Parse one line of line-delimited JSON
    pub fn from_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line).map(Self::new)
    }

    /// Parse one raw line; invalid UTF-8 is reported as a JSON syntax error
    pub fn from_slice(line: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(line).map(Self::new)
    }

    /// Borrow the underlying JSON document
    pub fn as_value(&self) -> &JsonValue {
        &self.data
    }
}

impl Selector for Record {
    fn select(&self, path: &FieldPath) -> Option<&JsonValue> {
        path.segments()
            .try_fold(&self.data, |current, part| current.as_object()?.get(part))
    }

    fn select_key(&self, key: &str) -> Option<&JsonValue> {
        // Validate key format before walking it
        if malformed_reason(key).is_some() {
            return None;
        }

        let mut current = &self.data;
        for part in key.split('.') {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

/// Render a JSON value as a key label: strings verbatim, whole-number floats
/// without a fraction (`200.0` -> `200`), everything else as compact JSON
pub fn value_label(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Largest magnitude below which every whole f64 is an exact integer
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Coerce a JSON value to a finite number. Numeric strings are accepted;
/// booleans, null, containers and non-numeric strings are not.
pub fn value_as_number(value: &JsonValue) -> Option<f64> {
    let number = match value {
        JsonValue::Number(n) => n.as_f64()?,
        JsonValue::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).unwrap()
    }

    #[test]
    fn test_record_selector() {
        let record = Record::new(json!({
            "message": "test message",
            "req": {
                "timers": { "getMetadata": 1234 }
            }
        }));

        // Simple field access
        assert_eq!(record.select(&path("message")), Some(&json!("test message")));

        // Nested field access
        assert_eq!(
            record.select(&path("req.timers.getMetadata")),
            Some(&json!(1234))
        );

        // Missing field
        assert_eq!(record.select(&path("missing")), None);
        assert_eq!(record.select(&path("req.timers.putObject")), None);
    }

    #[test]
    fn test_non_object_intermediate_is_absent() {
        let record = Record::new(json!({ "a": 5, "list": [{ "b": 1 }] }));

        assert_eq!(record.select(&path("a.b")), None);
        assert_eq!(record.select(&path("list.b")), None);
        assert_eq!(record.select(&path("list.0")), None);
    }

    #[test]
    fn test_top_level_non_object() {
        let record = Record::new(json!([1, 2, 3]));
        assert_eq!(record.select(&path("a")), None);

        let record = Record::new(json!("scalar"));
        assert_eq!(record.select_key("a"), None);
    }

    #[test]
    fn test_malformed_key_access() {
        let record = Record::new(json!({ "field": "value" }));

        assert_eq!(record.select_key(""), None);
        assert_eq!(record.select_key("field..other"), None);
        assert_eq!(record.select_key(".field"), None);
        assert_eq!(record.select_key("field."), None);
        assert_eq!(record.select_key("field"), Some(&json!("value")));
    }

    #[test]
    fn test_field_path_parse_rejects_empty_segments() {
        for raw in ["", ".a", "a.", "a..b", "."] {
            let err = FieldPath::parse(raw).unwrap_err();
            assert!(matches!(err, StatsError::InvalidFieldPath { .. }), "{raw}");
        }

        let parsed = path("req.timers.getMetadata");
        assert_eq!(parsed.as_str(), "req.timers.getMetadata");
        assert_eq!(
            parsed.segments().collect::<Vec<_>>(),
            vec!["req", "timers", "getMetadata"]
        );
    }

    #[test]
    fn test_field_path_serde() {
        let parsed: FieldPath = serde_json::from_str("\"a.b\"").unwrap();
        assert_eq!(parsed, path("a.b"));
        assert!(serde_json::from_str::<FieldPath>("\"a..b\"").is_err());
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"a.b\"");
    }

    #[test]
    fn test_value_label() {
        assert_eq!(value_label(&json!("putobject")), "putobject");
        assert_eq!(value_label(&json!(200)), "200");
        assert_eq!(value_label(&json!(1.5)), "1.5");
        assert_eq!(value_label(&json!(200.0)), "200");
        assert_eq!(value_label(&json!(-0.0)), "0");
        assert_eq!(value_label(&json!(1e300)), "1e300");
        assert_eq!(value_label(&json!(true)), "true");
        assert_eq!(value_label(&json!(null)), "null");
        assert_eq!(value_label(&json!({"k": 1})), "{\"k\":1}");
    }

    #[test]
    fn test_number_coercion_edge_cases() {
        assert_eq!(value_as_number(&json!(42)), Some(42.0));
        assert_eq!(value_as_number(&json!(-3.5)), Some(-3.5));
        assert_eq!(value_as_number(&json!(i64::MAX)), Some(i64::MAX as f64));
        assert_eq!(value_as_number(&json!(" 12 ")), Some(12.0));
        assert_eq!(value_as_number(&json!("abc")), None);
        assert_eq!(value_as_number(&json!("NaN")), None);
        assert_eq!(value_as_number(&json!(true)), None);
        assert_eq!(value_as_number(&json!(null)), None);
        assert_eq!(value_as_number(&json!([1])), None);
    }

    #[test]
    fn test_record_from_line() {
        let record = Record::from_line(r#"{"a":{"b":5},"r":"x"}"#).unwrap();
        assert_eq!(record.select_key("a.b"), Some(&json!(5)));
        assert!(Record::from_line("{not json").is_err());

        let record = Record::from_slice(b"{\"a\":1}\r").unwrap();
        assert_eq!(record.select_key("a"), Some(&json!(1)));
        assert!(Record::from_slice(b"{\"a\":\"\xff\"}").is_err());
    }
}
