//! Conversions between SDK value types and the crate's serde-friendly records.

use crate::error::Result;
use aws_smithy_types::{DateTime, Document, Number};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

/// Convert a `serde_json::Value` into an `aws_smithy_types::Document`.
///
/// Flow inputs, flow outputs and prompt variables travel as documents.
pub fn json_value_to_document(value: &Value) -> Document {
    match value {
        Value::Null => Document::Null,
        Value::Bool(b) => Document::Bool(*b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Document::Number(Number::PosInt(u))
            } else if let Some(i) = n.as_i64() {
                Document::Number(Number::NegInt(i))
            } else if let Some(f) = n.as_f64() {
                Document::Number(Number::Float(f))
            } else {
                Document::Null
            }
        }
        Value::String(s) => Document::String(s.clone()),
        Value::Array(arr) => Document::Array(arr.iter().map(json_value_to_document).collect()),
        Value::Object(obj) => Document::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), json_value_to_document(v)))
                .collect(),
        ),
    }
}

/// Inverse of [`json_value_to_document`].
pub fn document_to_json_value(doc: &Document) -> Value {
    match doc {
        Document::Null => Value::Null,
        Document::Bool(b) => Value::Bool(*b),
        Document::Number(n) => match *n {
            Number::PosInt(u) => Value::Number(serde_json::Number::from(u)),
            Number::NegInt(i) => Value::Number(serde_json::Number::from(i)),
            Number::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        },
        Document::String(s) => Value::String(s.clone()),
        Document::Array(arr) => Value::Array(arr.iter().map(document_to_json_value).collect()),
        Document::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), document_to_json_value(v)))
                .collect(),
        ),
    }
}

/// Convert an SDK timestamp to `chrono`. Out-of-range values fall back to the epoch.
pub fn to_chrono(dt: &DateTime) -> chrono::DateTime<Utc> {
    chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()).unwrap_or_default()
}

pub fn to_chrono_opt(dt: Option<&DateTime>) -> Option<chrono::DateTime<Utc>> {
    dt.map(to_chrono)
}

/// Pretty-print any response record as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flow_input_document_survives_conversion() {
        let value = json!({ "genre": "pop", "number": 5, "ratio": 0.5, "tags": [null, true] });

        let doc = json_value_to_document(&value);

        match &doc {
            Document::Object(map) => {
                assert_eq!(map.get("genre"), Some(&Document::String("pop".into())));
                assert_eq!(map.get("number"), Some(&Document::Number(Number::PosInt(5))));
            }
            other => panic!("expected object, got {other:?}"),
        }
        assert_eq!(document_to_json_value(&doc), value);
    }

    #[test]
    fn negative_numbers_use_neg_int() {
        assert_eq!(
            json_value_to_document(&json!(-3)),
            Document::Number(Number::NegInt(-3))
        );
    }

    #[test]
    fn timestamps_keep_seconds_and_nanos() {
        let dt = DateTime::from_secs_and_nanos(1_700_000_000, 250);
        let converted = to_chrono(&dt);
        assert_eq!(converted.timestamp(), 1_700_000_000);
        assert_eq!(converted.timestamp_subsec_nanos(), 250);
    }
}
