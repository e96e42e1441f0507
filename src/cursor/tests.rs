//! Tests for cursor module

use super::*;
use crate::model::{FieldDef, FieldType, ModelSchema, Record, Value};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn schema() -> ModelSchema {
    ModelSchema::new("events")
        .field(FieldDef::new("id", FieldType::Int))
        .field(FieldDef::new("score", FieldType::Float))
        .field(FieldDef::new("name", FieldType::Text))
        .field(FieldDef::new("at", FieldType::Timestamp))
        .field(FieldDef::new("active", FieldType::Bool))
        .field(FieldDef::nullable("note", FieldType::Text))
}

fn all_keys() -> Vec<&'static str> {
    vec!["id", "score", "name", "at", "active", "note"]
}

struct Event {
    id: i64,
    score: f64,
    name: String,
    at: chrono::DateTime<Utc>,
    active: bool,
    note: Option<String>,
}

impl Record for Event {
    fn value(&self, path: &str) -> Option<Value> {
        match path {
            "id" => Some(self.id.into()),
            "score" => Some(self.score.into()),
            "name" => Some(self.name.as_str().into()),
            "at" => Some(self.at.into()),
            "active" => Some(self.active.into()),
            "note" => Some(self.note.clone().into()),
            _ => None,
        }
    }
}

fn event() -> Event {
    Event {
        id: 42,
        score: 0.1 + 0.2,
        name: "a,b:c%d&e \"quoted\" ünïcode".to_string(),
        at: Utc
            .with_ymd_and_hms(2024, 5, 6, 7, 8, 9)
            .unwrap()
            .checked_add_signed(chrono::Duration::nanoseconds(123_456_789))
            .unwrap(),
        active: true,
        note: None,
    }
}

// ============================================================================
// Round Trip Tests
// ============================================================================

#[test]
fn test_round_trip_all_types() {
    let record = event();
    let token = Encoder::new(all_keys()).encode(&record).unwrap();
    let values = Decoder::new(all_keys()).decode(&token, &schema()).unwrap();

    assert_eq!(
        values,
        vec![
            Value::Int(42),
            Value::Float(0.1 + 0.2),
            Value::Text(record.name.clone()),
            Value::Timestamp(record.at),
            Value::Bool(true),
            Value::Null,
        ]
    );
}

#[test]
fn test_round_trip_nullable_with_value() {
    let mut record = event();
    record.note = Some("present".to_string());

    let token = Encoder::new(["note"]).encode(&record).unwrap();
    let values = Decoder::new(["note"]).decode(&token, &schema()).unwrap();
    assert_eq!(values, vec![Value::Text("present".to_string())]);
}

#[test]
fn test_round_trip_integer_extremes() {
    for id in [i64::MIN, -1, 0, i64::MAX] {
        let token = encode_values(&[Value::Int(id)]).unwrap();
        let values = Decoder::new(["id"]).decode(&token, &schema()).unwrap();
        assert_eq!(values, vec![Value::Int(id)]);
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let a = Encoder::new(all_keys()).encode(&event()).unwrap();
    let b = Encoder::new(all_keys()).encode(&event()).unwrap();
    assert_eq!(a, b);

    let c = encode_values(&[Value::Int(1), Value::Text("x".to_string())]).unwrap();
    let d = encode_values(&[Value::Int(1), Value::Text("x".to_string())]).unwrap();
    assert_eq!(c, d);
}

#[test]
fn test_token_is_url_safe() {
    let token = Encoder::new(all_keys()).encode(&event()).unwrap();
    assert!(token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

// ============================================================================
// Encode Error Tests
// ============================================================================

#[test]
fn test_encode_missing_value() {
    let err = Encoder::new(["id", "unknown"]).encode(&event()).unwrap_err();
    assert_eq!(
        err,
        CursorError::MissingValue {
            key: "unknown".to_string()
        }
    );
}

#[test]
fn test_encode_non_finite_float() {
    let err = encode_values(&[Value::Int(1), Value::Float(f64::INFINITY)]).unwrap_err();
    assert_eq!(err, CursorError::NonFiniteFloat { position: 1 });
}

// ============================================================================
// Decode Error Tests
// ============================================================================

fn encode_raw(payload: &str) -> String {
    URL_SAFE_NO_PAD.encode(payload)
}

#[test]
fn test_decode_empty() {
    let err = Decoder::new(["id"]).decode("", &schema()).unwrap_err();
    assert_eq!(err, CursorError::Empty);
}

#[test]
fn test_decode_too_long() {
    let token = "A".repeat(MAX_TOKEN_LEN + 1);
    let err = Decoder::new(["id"]).decode(&token, &schema()).unwrap_err();
    assert!(matches!(err, CursorError::TooLong { .. }));
}

#[test]
fn test_decode_bad_base64() {
    let err = Decoder::new(["id"]).decode("not base64!", &schema()).unwrap_err();
    assert!(matches!(err, CursorError::Base64 { .. }));
}

#[test]
fn test_decode_non_array_payload() {
    let err = Decoder::new(["id"])
        .decode(&encode_raw(r#"{"id":1}"#), &schema())
        .unwrap_err();
    assert!(matches!(err, CursorError::Payload { .. }));

    let err = Decoder::new(["id"])
        .decode(&encode_raw("[1,"), &schema())
        .unwrap_err();
    assert!(matches!(err, CursorError::Payload { .. }));
}

#[test]
fn test_decode_wrong_arity() {
    let token = encode_values(&[Value::Int(1), Value::Int(2)]).unwrap();
    let err = Decoder::new(["id"]).decode(&token, &schema()).unwrap_err();
    assert_eq!(
        err,
        CursorError::Arity {
            expected: 1,
            found: 2
        }
    );
}

#[test]
fn test_decode_type_mismatch() {
    let cases = [
        ("id", r#"["1"]"#, FieldType::Int),
        ("id", "[1.5]", FieldType::Int),
        ("name", "[1]", FieldType::Text),
        ("active", "[0]", FieldType::Bool),
        ("at", r#"["yesterday"]"#, FieldType::Timestamp),
        ("score", r#"["0.5"]"#, FieldType::Float),
        // null only decodes into nullable fields
        ("id", "[null]", FieldType::Int),
    ];

    for (key, payload, expected) in cases {
        let err = Decoder::new([key])
            .decode(&encode_raw(payload), &schema())
            .unwrap_err();
        assert_eq!(
            err,
            CursorError::TypeMismatch {
                key: key.to_string(),
                expected
            },
            "payload {payload}"
        );
    }
}

#[test]
fn test_decode_unknown_key() {
    let token = encode_values(&[Value::Int(1)]).unwrap();
    let err = Decoder::new(["missing"]).decode(&token, &schema()).unwrap_err();
    assert_eq!(
        err,
        CursorError::UnknownKey {
            key: "missing".to_string(),
            model: "events".to_string()
        }
    );
}

#[test]
fn test_decode_float_accepts_integral_json() {
    let values = Decoder::new(["score"])
        .decode(&encode_raw("[3]"), &schema())
        .unwrap();
    assert_eq!(values, vec![Value::Float(3.0)]);
}
