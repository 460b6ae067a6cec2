//! Built-in typed Fortis client.
//!
//! Request models take the amount as their first constructor argument. Calls go
//! through the same [`HttpTransport`] as the fallback path, after checking the
//! configured credentials locally.

use std::sync::Arc;

use common_utils::{
    ext_traits::{ByteSliceExt, Encode},
    request::{Method, RequestBuilder},
    CustomResult, MinorUnit,
};
use domain_types::errors::SdkError;
use error_stack::{report, ResultExt};
use external_services::service::HttpTransport;
use hyperswitch_masking::{Mask, Maskable, PeekInterface, Secret};
use interfaces::structured_client::{
    CredentialField, CredentialShape, CredentialValue, OptionalField, RequestArg, RequestKind,
    StructuredClient, StructuredClientBuilder, StructuredRequest, TransactionResponse,
};
use serde::Serialize;
use serde_json::Value;

use super::transformers::{
    paths, FortisAmountRequest, FortisKeyedTransactionRequest, FortisTokenTransactionRequest,
};

pub struct FortisSdkClientBuilder {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    developer_id: Option<Secret<String>>,
    user_id: Option<Secret<String>>,
    user_api_key: Option<Secret<String>>,
    headers: Vec<(String, Maskable<String>)>,
}

impl FortisSdkClientBuilder {
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            developer_id: None,
            user_id: None,
            user_api_key: None,
            headers: Vec::new(),
        }
    }
}

impl StructuredClientBuilder for FortisSdkClientBuilder {
    fn credential_setter(&self, _field: CredentialField) -> Option<CredentialShape> {
        Some(CredentialShape::Plain)
    }

    fn set_credential(
        &mut self,
        field: CredentialField,
        value: CredentialValue,
    ) -> CustomResult<(), SdkError> {
        let slot = match field {
            CredentialField::DeveloperId => &mut self.developer_id,
            CredentialField::UserId => &mut self.user_id,
            CredentialField::UserApiKey => &mut self.user_api_key,
        };
        *slot = Some(value.into_secret());
        Ok(())
    }

    fn accepts_headers(&self) -> bool {
        true
    }

    fn add_headers(&mut self, headers: Vec<(String, Maskable<String>)>) {
        self.headers.extend(headers);
    }

    fn build(self: Box<Self>) -> CustomResult<Box<dyn StructuredClient>, SdkError> {
        if self.base_url.is_empty() {
            return Err(report!(SdkError::Construction(
                "base url is not configured".to_string()
            )));
        }
        Ok(Box::new(FortisSdkClient {
            base_url: self.base_url,
            transport: self.transport,
            developer_id: self.developer_id,
            user_id: self.user_id,
            user_api_key: self.user_api_key,
            headers: self.headers,
        }))
    }
}

pub struct FortisSdkClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    developer_id: Option<Secret<String>>,
    user_id: Option<Secret<String>>,
    user_api_key: Option<Secret<String>>,
    headers: Vec<(String, Maskable<String>)>,
}

impl FortisSdkClient {
    /// Rejects missing credentials before anything is sent
    fn auth_headers(&self) -> CustomResult<Vec<(String, Maskable<String>)>, SdkError> {
        let credentials = [
            (CredentialField::DeveloperId, &self.developer_id),
            (CredentialField::UserId, &self.user_id),
            (CredentialField::UserApiKey, &self.user_api_key),
        ];
        credentials
            .into_iter()
            .map(|(field, value)| -> CustomResult<(String, Maskable<String>), SdkError> {
                let value = value
                    .as_ref()
                    .map(|value| value.peek().trim())
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| report!(SdkError::AuthValidation(format!("{field} is not set"))))?;
                let header = field.to_string().replace('_', "-");
                Ok(match field {
                    CredentialField::UserApiKey => (header, value.to_string().into_masked()),
                    CredentialField::DeveloperId | CredentialField::UserId => {
                        (header, value.to_string().into())
                    }
                })
            })
            .collect()
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> CustomResult<TransactionResponse, SdkError> {
        let auth_headers = self.auth_headers()?;
        let mut headers = self.headers.clone();
        headers.retain(|(name, _)| !auth_headers.iter().any(|(auth, _)| auth == name));
        headers.extend(auth_headers);

        let request = RequestBuilder::new()
            .method(method)
            .url(&format!("{}/{}", self.base_url, path))
            .headers(headers)
            .set_optional_body(body)
            .build();

        let response = self.transport.send(request).await.map_err(|error| {
            let message = error.current_context().to_string();
            error.change_context(SdkError::Api {
                code: 0,
                message,
                raw_body: None,
            })
        })?;

        match response {
            Ok(response) => response
                .response
                .as_ref()
                .parse_struct::<TransactionResponse>("TransactionResponse")
                .change_context(SdkError::Api {
                    code: i64::from(response.status_code),
                    message: "Unable to decode transaction response".to_string(),
                    raw_body: Some(String::from_utf8_lossy(&response.response).into_owned()),
                }),
            Err(response) => Err(report!(SdkError::Api {
                code: i64::from(response.status_code),
                message: format!("HTTP Response Not OK. Status code: {}", response.status_code),
                raw_body: Some(String::from_utf8_lossy(&response.response).into_owned()),
            })),
        }
    }
}

#[async_trait::async_trait]
impl StructuredClient for FortisSdkClient {
    fn build_request(
        &self,
        kind: RequestKind,
        args: Vec<RequestArg>,
    ) -> CustomResult<Box<dyn StructuredRequest>, SdkError> {
        let request: Box<dyn StructuredRequest> = match (kind, args.as_slice()) {
            (
                RequestKind::SaleToken | RequestKind::AuthOnlyToken,
                [RequestArg::Amount(amount), RequestArg::Text(token_id)],
            ) => Box::new(TokenTransactionModel {
                kind,
                body: FortisTokenTransactionRequest {
                    token_id: token_id.clone(),
                    transaction_amount: *amount,
                    order_number: None,
                    location_id: None,
                },
            }),
            (
                RequestKind::SaleKeyed | RequestKind::AuthOnlyKeyed,
                [RequestArg::Amount(amount), RequestArg::Text(account_number), RequestArg::Text(exp_date)],
            ) => Box::new(KeyedTransactionModel {
                kind,
                body: FortisKeyedTransactionRequest {
                    account_number: account_number.clone(),
                    exp_date: exp_date.clone(),
                    cvv: None,
                    transaction_amount: *amount,
                    order_number: None,
                    location_id: None,
                },
            }),
            (RequestKind::AuthComplete | RequestKind::Refund, [RequestArg::Amount(amount)]) => {
                Box::new(AmountModel {
                    kind,
                    body: FortisAmountRequest {
                        transaction_amount: Some(*amount),
                    },
                })
            }
            (RequestKind::AuthComplete | RequestKind::Refund, []) => Box::new(AmountModel {
                kind,
                body: FortisAmountRequest::default(),
            }),
            (kind, args) => {
                return Err(report!(SdkError::InvalidArguments(format!(
                    "{kind} does not take {} argument(s) in this order",
                    args.len()
                ))))
            }
        };
        Ok(request)
    }

    async fn create_transaction(
        &self,
        request: Box<dyn StructuredRequest>,
    ) -> CustomResult<TransactionResponse, SdkError> {
        let path = match request.kind() {
            RequestKind::SaleToken => paths::SALE_TOKEN,
            RequestKind::SaleKeyed => paths::SALE_KEYED,
            RequestKind::AuthOnlyToken => paths::AUTH_ONLY_TOKEN,
            RequestKind::AuthOnlyKeyed => paths::AUTH_ONLY_KEYED,
            kind @ (RequestKind::AuthComplete | RequestKind::Refund) => {
                return Err(report!(SdkError::InvalidArguments(format!(
                    "{kind} needs a transaction id"
                ))))
            }
        };
        self.call(Method::Post, path, Some(request.encode()?)).await
    }

    async fn auth_complete(
        &self,
        transaction_id: &str,
        request: Box<dyn StructuredRequest>,
    ) -> CustomResult<TransactionResponse, SdkError> {
        self.call(
            Method::Post,
            &paths::auth_complete(transaction_id),
            Some(request.encode()?),
        )
        .await
    }

    async fn refund_transaction(
        &self,
        transaction_id: &str,
        request: Box<dyn StructuredRequest>,
    ) -> CustomResult<TransactionResponse, SdkError> {
        self.call(
            Method::Post,
            &paths::refund(transaction_id),
            Some(request.encode()?),
        )
        .await
    }

    async fn void_transaction(
        &self,
        transaction_id: &str,
    ) -> CustomResult<TransactionResponse, SdkError> {
        self.call(
            Method::Post,
            &paths::void(transaction_id),
            Some(Value::Object(Default::default())),
        )
        .await
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> CustomResult<TransactionResponse, SdkError> {
        self.call(Method::Get, &paths::transaction(transaction_id), None)
            .await
    }
}

#[derive(Debug)]
struct TokenTransactionModel {
    kind: RequestKind,
    body: FortisTokenTransactionRequest,
}

#[derive(Debug)]
struct KeyedTransactionModel {
    kind: RequestKind,
    body: FortisKeyedTransactionRequest,
}

#[derive(Debug)]
struct AmountModel {
    kind: RequestKind,
    body: FortisAmountRequest,
}

fn text(field: OptionalField, value: RequestArg) -> CustomResult<Secret<String>, SdkError> {
    match value {
        RequestArg::Text(value) => Ok(value),
        RequestArg::Amount(_) => Err(report!(SdkError::InvalidArguments(format!(
            "{field} takes a string"
        )))),
    }
}

fn amount(field: OptionalField, value: RequestArg) -> CustomResult<MinorUnit, SdkError> {
    match value {
        RequestArg::Amount(amount) => Ok(amount),
        RequestArg::Text(_) => Err(report!(SdkError::InvalidArguments(format!(
            "{field} takes an amount"
        )))),
    }
}

fn unsupported(kind: RequestKind, field: OptionalField) -> error_stack::Report<SdkError> {
    report!(SdkError::InvalidArguments(format!(
        "{kind} has no {field} field"
    )))
}

fn encode<T: Serialize>(body: &T) -> CustomResult<Value, SdkError> {
    body.encode_to_value()
        .change_context(SdkError::Construction("request encoding failed".to_string()))
}

impl StructuredRequest for TokenTransactionModel {
    fn kind(&self) -> RequestKind {
        self.kind
    }

    fn supports(&self, field: OptionalField) -> bool {
        matches!(field, OptionalField::OrderNumber | OptionalField::LocationId)
    }

    fn set(&mut self, field: OptionalField, value: RequestArg) -> CustomResult<(), SdkError> {
        match field {
            OptionalField::OrderNumber => {
                self.body.order_number = Some(text(field, value)?.peek().clone());
            }
            OptionalField::LocationId => {
                self.body.location_id = Some(text(field, value)?.peek().clone());
            }
            OptionalField::Cvv | OptionalField::TransactionAmount => {
                return Err(unsupported(self.kind, field))
            }
        }
        Ok(())
    }

    fn encode(&self) -> CustomResult<Value, SdkError> {
        encode(&self.body)
    }
}

impl StructuredRequest for KeyedTransactionModel {
    fn kind(&self) -> RequestKind {
        self.kind
    }

    fn supports(&self, field: OptionalField) -> bool {
        matches!(
            field,
            OptionalField::Cvv | OptionalField::OrderNumber | OptionalField::LocationId
        )
    }

    fn set(&mut self, field: OptionalField, value: RequestArg) -> CustomResult<(), SdkError> {
        match field {
            OptionalField::Cvv => self.body.cvv = Some(text(field, value)?),
            OptionalField::OrderNumber => {
                self.body.order_number = Some(text(field, value)?.peek().clone());
            }
            OptionalField::LocationId => {
                self.body.location_id = Some(text(field, value)?.peek().clone());
            }
            OptionalField::TransactionAmount => return Err(unsupported(self.kind, field)),
        }
        Ok(())
    }

    fn encode(&self) -> CustomResult<Value, SdkError> {
        encode(&self.body)
    }
}

impl StructuredRequest for AmountModel {
    fn kind(&self) -> RequestKind {
        self.kind
    }

    fn supports(&self, field: OptionalField) -> bool {
        field == OptionalField::TransactionAmount
    }

    fn set(&mut self, field: OptionalField, value: RequestArg) -> CustomResult<(), SdkError> {
        match field {
            OptionalField::TransactionAmount => {
                self.body.transaction_amount = Some(amount(field, value)?);
                Ok(())
            }
            OptionalField::Cvv | OptionalField::OrderNumber | OptionalField::LocationId => {
                Err(unsupported(self.kind, field))
            }
        }
    }

    fn encode(&self) -> CustomResult<Value, SdkError> {
        encode(&self.body)
    }
}
