//! Token encoder and decoder

use crate::model::{FieldType, ModelSchema, Record, Value};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::Value as Json;
use thiserror::Error;

/// Upper bound on accepted token length, checked before any decoding
pub const MAX_TOKEN_LEN: usize = 8 * 1024;

/// Cursor encoding and decoding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token is not valid base64: {message}")]
    Base64 { message: String },

    #[error("cursor payload is not a JSON array: {message}")]
    Payload { message: String },

    #[error("cursor holds {found} values but {expected} keys are paged")]
    Arity { expected: usize, found: usize },

    #[error("key '{key}' does not resolve on model '{model}'")]
    UnknownKey { key: String, model: String },

    #[error("cursor value for '{key}' is not a valid {expected}")]
    TypeMismatch { key: String, expected: FieldType },

    #[error("record has no value for key '{key}'")]
    MissingValue { key: String },

    #[error("value at position {position} is a non-finite float")]
    NonFiniteFloat { position: usize },
}

// ============================================================================
// Tuple Codec
// ============================================================================

/// Encode an ordered value tuple into a token.
///
/// Equal tuples always produce equal tokens.
pub fn encode_values(values: &[Value]) -> Result<String, CursorError> {
    let items = values
        .iter()
        .enumerate()
        .map(|(position, value)| {
            value
                .to_json()
                .ok_or(CursorError::NonFiniteFloat { position })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Serializing a JSON array of scalars cannot fail
    let payload = Json::Array(items).to_string();
    Ok(URL_SAFE_NO_PAD.encode(payload))
}

/// Decode a token into values typed by `types` (one `(type, nullable)` per key).
pub fn decode_values(
    token: &str,
    keys: &[String],
    types: &[(FieldType, bool)],
) -> Result<Vec<Value>, CursorError> {
    if token.is_empty() {
        return Err(CursorError::Empty);
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(CursorError::TooLong {
            len: token.len(),
            max: MAX_TOKEN_LEN,
        });
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| CursorError::Base64 {
            message: e.to_string(),
        })?;

    let items = match serde_json::from_slice::<Json>(&bytes) {
        Ok(Json::Array(items)) => items,
        Ok(other) => {
            return Err(CursorError::Payload {
                message: format!("found {other}"),
            })
        }
        Err(e) => {
            return Err(CursorError::Payload {
                message: e.to_string(),
            })
        }
    };

    if items.len() != types.len() {
        return Err(CursorError::Arity {
            expected: types.len(),
            found: items.len(),
        });
    }

    items
        .into_iter()
        .zip(keys.iter().zip(types))
        .map(|(item, (key, &(field_type, nullable)))| {
            from_json(item, field_type, nullable).ok_or_else(|| CursorError::TypeMismatch {
                key: key.clone(),
                expected: field_type,
            })
        })
        .collect()
}

fn from_json(json: Json, field_type: FieldType, nullable: bool) -> Option<Value> {
    if json.is_null() {
        return nullable.then_some(Value::Null);
    }

    match field_type {
        FieldType::Bool => json.as_bool().map(Value::Bool),
        FieldType::Int => json.as_i64().map(Value::Int),
        FieldType::Float => json.as_f64().map(Value::Float),
        FieldType::Text => match json {
            Json::String(s) => Some(Value::Text(s)),
            _ => None,
        },
        FieldType::Timestamp => json
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| Value::Timestamp(ts.with_timezone(&Utc))),
    }
}

// ============================================================================
// Encoder
// ============================================================================

/// Builds tokens from records for a fixed key sequence
#[derive(Debug, Clone)]
pub struct Encoder {
    keys: Vec<String>,
}

impl Encoder {
    /// Create an encoder for the given keys
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the key values off a record and encode them
    pub fn encode<R: Record + ?Sized>(&self, record: &R) -> Result<String, CursorError> {
        let values = self
            .keys
            .iter()
            .map(|key| {
                record
                    .value(key)
                    .ok_or_else(|| CursorError::MissingValue { key: key.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        encode_values(&values)
    }
}

// ============================================================================
// Decoder
// ============================================================================

/// Rebuilds key values from tokens for a fixed key sequence
#[derive(Debug, Clone)]
pub struct Decoder {
    keys: Vec<String>,
}

impl Decoder {
    /// Create a decoder for the given keys
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Decode a token, typing each value by its key's field in `schema`
    pub fn decode(&self, token: &str, schema: &ModelSchema) -> Result<Vec<Value>, CursorError> {
        let types = self
            .keys
            .iter()
            .map(|key| {
                schema
                    .resolve(key)
                    .map(|field| (field.field_type, field.nullable))
                    .ok_or_else(|| CursorError::UnknownKey {
                        key: key.clone(),
                        model: schema.storage_name().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        decode_values(token, &self.keys, &types)
    }
}
