use common_utils::{consts, ext_traits::ByteSliceExt, MinorUnit};
use domain_types::{
    connector_types::{coerce_error_messages, is_empty_errors, LifecycleStatus, NormalizedResult},
    errors::{ApiClientError, SdkError},
    payment_method_data::KeyedCard,
    router_response_types::Response,
};
use hyperswitch_masking::Secret;
use serde::Serialize;
use serde_json::Value;

/// Processor status codes at or above this value mean the transaction went through.
pub const SUCCESS_STATUS_CODE_THRESHOLD: i64 = 1000;

/// Transaction types that only place a hold on the card
pub const AUTHORIZATION_ONLY_TYPES: [&str; 2] = ["auth", "authonly"];

pub const MISSING_TRANSACTION_ID: &str = "Missing transaction id";
pub const INVALID_TRANSACTION_ID: &str = "Invalid transaction id";
pub const TRANSACTION_ERROR_KEY: &str = "transaction";

pub(super) mod paths {
    pub const SALE_TOKEN: &str = "v1/transactions/cc/sale/token";
    pub const SALE_KEYED: &str = "v1/transactions/cc/sale/keyed";
    pub const AUTH_ONLY_TOKEN: &str = "v1/transactions/cc/auth-only/token";
    pub const AUTH_ONLY_KEYED: &str = "v1/transactions/cc/auth-only/keyed";
    pub const CARD_TOKEN: &str = "v1/tokens/cc";

    pub fn auth_complete(transaction_id: &str) -> String {
        format!("v1/transactions/{transaction_id}/auth-complete")
    }

    pub fn void(transaction_id: &str) -> String {
        format!("v1/transactions/{transaction_id}/void")
    }

    pub fn refund(transaction_id: &str) -> String {
        format!("v1/transactions/{transaction_id}/refund")
    }

    pub fn transaction(transaction_id: &str) -> String {
        format!("v1/transactions/{transaction_id}")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FortisTokenTransactionRequest {
    pub token_id: Secret<String>,
    pub transaction_amount: MinorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FortisKeyedTransactionRequest {
    pub account_number: Secret<String>,
    pub exp_date: Secret<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<Secret<String>>,
    pub transaction_amount: MinorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

impl FortisKeyedTransactionRequest {
    pub fn new(
        card: &KeyedCard,
        transaction_amount: MinorUnit,
        order_number: Option<String>,
        location_id: Option<String>,
    ) -> Self {
        Self {
            account_number: card.account_number.clone(),
            exp_date: card.exp_date.clone(),
            cvv: card.cvv.clone(),
            transaction_amount,
            order_number,
            location_id,
        }
    }
}

/// Body of auth-complete and refund calls
#[derive(Debug, Clone, Default, Serialize)]
pub struct FortisAmountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_amount: Option<MinorUnit>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FortisVoidRequest {}

#[derive(Debug, Clone, Serialize)]
pub struct FortisCardTokenRequest {
    pub location_id: String,
    pub account_number: Secret<String>,
    pub exp_date: Secret<String>,
    pub account_holder_name: String,
}

/// Canonical form of a typed client response. All processor fields stay under `data`.
pub fn to_normalized<T: Serialize>(response: &T) -> NormalizedResult {
    match serde_json::to_value(response) {
        Ok(value) => NormalizedResult::from(value),
        Err(error) => NormalizedResult::error(
            consts::API_ERROR_KEY,
            format!("Unable to read processor response: {error}"),
            0,
        ),
    }
}

/// Canonical form of a typed client failure.
///
/// A processor body carrying `errors` is surfaced as is; anything else becomes a
/// single `api` message. The failure's numeric code is always attached.
pub fn error_from_sdk(error: &SdkError) -> NormalizedResult {
    let code = error.code();
    let processor_errors = error
        .raw_body()
        .and_then(|body| body.as_bytes().parse_struct::<Value>("SdkErrorBody").ok())
        .and_then(|mut body| body.get_mut("errors").map(Value::take))
        .filter(|errors| !is_empty_errors(errors));

    match processor_errors {
        Some(errors) => NormalizedResult::Failure {
            errors: coerce_error_messages(errors),
            code,
        },
        None => NormalizedResult::error(consts::API_ERROR_KEY, error.to_string().trim(), code),
    }
}

/// Canonical form of a raw HTTP body. Unparseable bodies degrade to an `http` error.
pub fn from_http_body(body: &[u8], code: i64) -> NormalizedResult {
    match body.parse_struct::<Value>("FortisResponse") {
        Ok(value) => NormalizedResult::from(value),
        Err(error) => NormalizedResult::http_error(
            format!("Unable to parse processor response: {}", error.current_context()),
            code,
        ),
    }
}

/// Canonical form of an answered fallback call. Error statuses keep the processor's
/// own `errors` when it sent any, with the HTTP status as code.
pub fn from_http_response(outcome: Result<Response, Response>) -> NormalizedResult {
    match outcome {
        Ok(response) => from_http_body(&response.response, 0),
        Err(response) => {
            let code = i64::from(response.status_code);
            let processor_errors = response
                .response
                .as_ref()
                .parse_struct::<Value>("FortisErrorResponse")
                .ok()
                .and_then(|mut body| body.get_mut("errors").map(Value::take))
                .filter(|errors| !is_empty_errors(errors));
            match processor_errors {
                Some(errors) => NormalizedResult::Failure {
                    errors: coerce_error_messages(errors),
                    code,
                },
                None => NormalizedResult::http_error(
                    format!("Processor responded with HTTP status {code}"),
                    code,
                ),
            }
        }
    }
}

pub fn from_transport_error(error: &ApiClientError) -> NormalizedResult {
    NormalizedResult::http_error(error.to_string(), 0)
}

/// Locally synthesized failure for operations called without a transaction id
pub fn missing_transaction_id() -> NormalizedResult {
    NormalizedResult::error(TRANSACTION_ERROR_KEY, MISSING_TRANSACTION_ID, 0)
}

/// Transaction id usable as a URL path segment.
///
/// Blank ids and ids with characters outside `[A-Za-z0-9_-]` are answered
/// with a local `transaction` error instead.
pub fn transaction_id_segment(transaction_id: &str) -> Result<String, NormalizedResult> {
    let transaction_id = transaction_id.trim();
    if transaction_id.is_empty() {
        return Err(missing_transaction_id());
    }
    if !transaction_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(NormalizedResult::error(
            TRANSACTION_ERROR_KEY,
            INVALID_TRANSACTION_ID,
            0,
        ));
    }
    Ok(transaction_id.to_string())
}

/// Token id out of a card tokenization response, `data.id` then `token.id`
pub fn token_id_from_response(body: &Value) -> Option<String> {
    ["/data/id", "/token/id"]
        .into_iter()
        .filter_map(|pointer| body.pointer(pointer))
        .find_map(|id| match id {
            Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
}

/// Lifecycle status of the last result attached to a payment
pub fn resolve_status(result: Option<&NormalizedResult>) -> LifecycleStatus {
    match result {
        None => LifecycleStatus::New,
        Some(NormalizedResult::Failure { errors, .. }) if !errors.is_empty() => {
            LifecycleStatus::Failed
        }
        Some(NormalizedResult::Failure { .. }) => LifecycleStatus::Unknown,
        Some(NormalizedResult::Success { data }) => {
            status_from_code(data.status_code, data.transaction_type.as_deref())
        }
    }
}

/// Lifecycle status of a stored response value, read exactly as persisted.
///
/// Errors are checked before the status code, so a malformed body carrying both
/// resolves to `Failed`.
pub fn resolve_stored_status(stored: Option<&Value>) -> LifecycleStatus {
    let response = match stored {
        None | Some(Value::Null) => return LifecycleStatus::New,
        Some(Value::Object(map)) if map.is_empty() => return LifecycleStatus::New,
        Some(Value::Array(list)) if list.is_empty() => return LifecycleStatus::New,
        Some(response) => response,
    };

    if response
        .get("errors")
        .is_some_and(|errors| !is_empty_errors(errors))
    {
        return LifecycleStatus::Failed;
    }

    let data = response.get("data");
    let status_code = data
        .and_then(|data| data.get("status_code"))
        .and_then(|code| match code {
            Value::Number(code) => code.as_i64(),
            Value::String(code) => code.trim().parse().ok(),
            _ => None,
        });
    let transaction_type = data
        .and_then(|data| data.get("type"))
        .and_then(Value::as_str);
    status_from_code(status_code, transaction_type)
}

fn status_from_code(status_code: Option<i64>, transaction_type: Option<&str>) -> LifecycleStatus {
    match status_code {
        Some(code) if code >= SUCCESS_STATUS_CODE_THRESHOLD => {
            if transaction_type.is_some_and(|kind| AUTHORIZATION_ONLY_TYPES.contains(&kind)) {
                LifecycleStatus::Authorized
            } else {
                LifecycleStatus::Captured
            }
        }
        _ => LifecycleStatus::Unknown,
    }
}
