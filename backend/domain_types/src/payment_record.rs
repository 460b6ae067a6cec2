//! The payment record the host framework persists between lifecycle steps.

use common_utils::MinorUnit;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::connector_types::NormalizedResult;

/// Primary response: authorization, sale, or completed capture
pub const FORTIS_RESPONSE: &str = "fortis_response";
/// Authorization kept aside once it has been completed by a capture
pub const FORTIS_AUTH_RESPONSE: &str = "fortis_auth_response";
/// Failed capture of a standing authorization
pub const FORTIS_CAPTURE_RESPONSE: &str = "fortis_capture_response";
pub const FORTIS_VOID_RESPONSE: &str = "fortis_void_response";
pub const FORTIS_REFUND_RESPONSE: &str = "fortis_refund_response";
/// Transaction id supplied by the integrator when no response is stored
pub const FORTIS_TRANSACTION_ID: &str = "fortis_transaction_id";
pub const REFUND_AMOUNT_MINOR: &str = "refund_amount_minor";
pub const AMOUNT_MINOR: &str = "amount_minor";

/// Free-form details map attached to a payment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentDetails(serde_json::Map<String, Value>);

impl PaymentDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(key.to_string(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Non-empty string value, numbers are rendered as strings
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(value) if !value.trim().is_empty() => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(value) => value.as_i64(),
            Value::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn store_result(&mut self, key: &str, result: &NormalizedResult) {
        self.0.insert(key.to_string(), result.to_value());
    }

    /// Stored response under `key`, exactly as persisted
    pub fn response(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Stored response under `key` in canonical form
    pub fn result(&self, key: &str) -> Option<NormalizedResult> {
        self.response(key).cloned().map(NormalizedResult::from)
    }

    /// Transaction id from the primary response, then the integrator-supplied id
    pub fn transaction_id(&self) -> Option<String> {
        self.response(FORTIS_RESPONSE)
            .and_then(|response| response.pointer("/data/id"))
            .and_then(|id| match id {
                Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
                Value::Number(id) => Some(id.to_string()),
                _ => None,
            })
            .or_else(|| self.get_str(FORTIS_TRANSACTION_ID))
    }

    /// Explicit refund amount, then the original amount, then zero
    pub fn refund_amount(&self) -> MinorUnit {
        MinorUnit::new(
            self.get_i64(REFUND_AMOUNT_MINOR)
                .or_else(|| self.get_i64(AMOUNT_MINOR))
                .unwrap_or(0),
        )
    }

    pub fn into_inner(self) -> serde_json::Map<String, Value> {
        self.0
    }
}

impl From<serde_json::Map<String, Value>> for PaymentDetails {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Host payment as handed to the conversion step.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaymentSource {
    pub id: String,
    pub amount: MinorUnit,
    /// Number of the order this payment belongs to
    pub order_number: Option<String>,
    #[serde(default)]
    pub details: PaymentDetails,
}
