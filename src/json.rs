//! Projection between bencode values and JSON.
//!
//! JSON has no byte strings, so binary payloads are rendered as lowercase hex
//! and integer dictionary keys as decimal text. The projection is one way for
//! those: converting the JSON back yields text strings.

use serde_json::{Map, Number, Value as Json};

use crate::bencode::encode;
use crate::bytestring::ByteString;
use crate::error::EncodeError;
use crate::value::{Dictionary, Key, Value};

impl Value {
    pub fn to_json(&self) -> Json {
        match self {
            Value::Integer(i) => Json::Number(Number::from(*i)),
            Value::String(bs) => Json::String(project_string(bs)),
            Value::List(list) => Json::Array(list.iter().map(Value::to_json).collect()),
            Value::Dictionary(dict) => Json::Object(
                dict.iter()
                    .map(|(key, value)| (project_key(key), value.to_json()))
                    .collect::<Map<String, Json>>(),
            ),
        }
    }
}

fn project_string(bs: &ByteString) -> String {
    match bs.as_text() {
        Some(text) => text.to_owned(),
        None => bs.to_hex(),
    }
}

fn project_key(key: &Key) -> String {
    match key {
        Key::Integer(i) => i.to_string(),
        Key::String(bs) => project_string(bs),
    }
}

impl TryFrom<&Json> for Value {
    type Error = EncodeError;

    fn try_from(json: &Json) -> Result<Self, Self::Error> {
        match json {
            Json::Null => Err(EncodeError::UnsupportedType { type_name: "null" }),
            Json::Bool(_) => Err(EncodeError::UnsupportedType { type_name: "boolean" }),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Integer(i)),
                None if n.is_u64() => Err(EncodeError::UnsupportedType { type_name: "u64 above i64::MAX" }),
                None => Err(EncodeError::UnsupportedType { type_name: "float" }),
            },
            Json::String(s) => Ok(Value::from(s.as_str())),
            Json::Array(items) => items
                .iter()
                .map(Value::try_from)
                .collect::<Result<Vec<Value>, EncodeError>>()
                .map(Value::List),
            Json::Object(map) => map
                .iter()
                .map(|(key, value)| Ok((Key::from(key.as_str()), Value::try_from(value)?)))
                .collect::<Result<Dictionary, EncodeError>>()
                .map(Value::Dictionary),
        }
    }
}

/// Bencodes a JSON document. Fails on `null`, booleans and non integral numbers.
pub fn encode_json(json: &Json) -> Result<Vec<u8>, EncodeError> {
    encode(&Value::try_from(json)?)
}
