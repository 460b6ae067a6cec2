use std::collections::BTreeMap;

use common_utils::{consts, MinorUnit};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::payment_method_data::PaymentMethodSelector;

/// Field name to ordered messages, as reported by the processor
pub type ErrorMessages = BTreeMap<String, Vec<String>>;

#[derive(Clone, Debug)]
pub struct TransactionRequest {
    pub amount: MinorUnit,
    pub order_number: Option<String>,
    /// Falls back to the credentials' default location when absent
    pub location_id: Option<String>,
    pub payment_method: PaymentMethodSelector,
}

/// Successful processor transaction. Unknown processor fields are preserved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionData {
    #[serde(default, deserialize_with = "lenient_transaction_id")]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_status_code"
    )]
    pub status_code: Option<i64>,
    #[serde(flatten)]
    pub additional_fields: serde_json::Map<String, Value>,
}

/// The processor may send ids as numbers; they are kept in their decimal form.
fn lenient_transaction_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => id,
        Value::Number(id) => id.to_string(),
        _ => String::new(),
    })
}

fn lenient_status_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|code| code as i64)),
        Value::String(code) => code.trim().parse().ok(),
        _ => None,
    })
}

/// Canonical outcome of every transaction operation: exactly one of `data`
/// or `errors`, never both and never neither.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "Value")]
pub enum NormalizedResult {
    Success { data: TransactionData },
    Failure { errors: ErrorMessages, code: i64 },
}

impl NormalizedResult {
    pub fn success(data: TransactionData) -> Self {
        Self::Success { data }
    }

    /// Single-message failure under `field`
    pub fn error(field: &str, message: impl Into<String>, code: i64) -> Self {
        let mut errors = ErrorMessages::new();
        errors.insert(field.to_string(), vec![message.into()]);
        Self::Failure { errors, code }
    }

    /// Failure of the fallback transport itself
    pub fn http_error(message: impl Into<String>, code: i64) -> Self {
        Self::error(consts::HTTP_ERROR_KEY, message, code)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&TransactionData> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn errors(&self) -> Option<&ErrorMessages> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { errors, .. } => Some(errors),
        }
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.data()
            .map(|data| data.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({
                "errors": { consts::API_ERROR_KEY: ["Unable to encode result"] },
                "code": 0,
            })
        })
    }
}

impl From<Value> for NormalizedResult {
    /// Total conversion: a body that is not already canonical degrades to an
    /// error entry rather than failing.
    fn from(value: Value) -> Self {
        let Value::Object(mut body) = value else {
            return Self::http_error("Unexpected response shape from processor", 0);
        };
        let code = body.get("code").and_then(code_from_value).unwrap_or(0);

        match body.remove("errors") {
            Some(errors) if !is_empty_errors(&errors) => {
                return Self::Failure {
                    errors: coerce_error_messages(errors),
                    code,
                }
            }
            _ => (),
        }

        let data = body
            .remove("data")
            .filter(Value::is_object)
            .or_else(|| body.remove("transaction").filter(Value::is_object));

        match data.map(serde_json::from_value::<TransactionData>) {
            Some(Ok(data)) => Self::Success { data },
            Some(Err(err)) => Self::http_error(format!("Malformed transaction data: {err}"), code),
            None => Self::http_error("Unexpected response shape from processor", code),
        }
    }
}

fn code_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(code) => code.trim().parse().ok(),
        _ => None,
    }
}

/// True when an `errors` field carries nothing worth reporting
pub fn is_empty_errors(errors: &Value) -> bool {
    match errors {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(list) => list.is_empty(),
        Value::String(message) => message.trim().is_empty(),
        Value::Bool(flag) => !flag,
        Value::Number(_) => false,
    }
}

/// Coerces a processor `errors` field into field -> messages.
pub fn coerce_error_messages(errors: Value) -> ErrorMessages {
    match errors {
        Value::Object(map) => map
            .into_iter()
            .map(|(field, messages)| (field, messages_from_value(messages)))
            .collect(),
        other => {
            let mut coerced = ErrorMessages::new();
            coerced.insert(consts::API_ERROR_KEY.to_string(), messages_from_value(other));
            coerced
        }
    }
}

fn messages_from_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().map(message_from_value).collect(),
        other => vec![message_from_value(other)],
    }
}

fn message_from_value(value: Value) -> String {
    match value {
        Value::String(message) => message,
        other => other.to_string(),
    }
}

/// Payment status as seen by the host framework. Always derived from the last
/// stored result, never persisted on its own.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleStatus {
    New,
    Authorized,
    Captured,
    Failed,
    Unknown,
}
