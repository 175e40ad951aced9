use serde::{ser::Error, Serialize, Serializer};

use crate::{JsonValueError, PropertyKey, Value};

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(key, value)| (PropertyKey::String(key), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Integral numbers inside the safe range become JSON integers so that `2.0`
/// is written as `2`. `-0` keeps its float form.
fn json_number(n: f64) -> Result<serde_json::Number, JsonValueError> {
    if !n.is_finite() {
        return Err(JsonValueError::NonFiniteNumber(n));
    }
    if is_json_integer(n) {
        Ok((n as i64).into())
    } else {
        serde_json::Number::from_f64(n).ok_or(JsonValueError::NonFiniteNumber(n))
    }
}

fn is_json_integer(n: f64) -> bool {
    n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER && !(n == 0.0 && n.is_sign_negative())
}

fn json_key(key: &PropertyKey) -> Result<&str, JsonValueError> {
    key.as_str().ok_or_else(|| JsonValueError::SymbolKey {
        key: key.to_string(),
    })
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = JsonValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(json_number(*n)?),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(obj) => serde_json::Value::Object(
                obj.iter()
                    .map(|(key, value)| -> Result<_, JsonValueError> {
                        Ok((json_key(key)?.to_string(), serde_json::Value::try_from(value)?))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            Value::BigInt(_) | Value::Symbol(_) | Value::Opaque(_) => {
                return Err(JsonValueError::Unsupported { kind: value.kind() })
            }
        })
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if !n.is_finite() => {
                Err(S::Error::custom(JsonValueError::NonFiniteNumber(*n)))
            }
            Value::Number(n) if is_json_integer(*n) => serializer.serialize_i64(*n as i64),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(obj) => serializer.collect_map(obj),
            Value::BigInt(_) | Value::Symbol(_) | Value::Opaque(_) => {
                Err(S::Error::custom(JsonValueError::Unsupported { kind: self.kind() }))
            }
        }
    }
}

impl Serialize for PropertyKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(json_key(self).map_err(S::Error::custom)?)
    }
}
