//! Optional-capability seam for a typed processor client.
//!
//! A typed client is assembled once from credentials through a
//! [`StructuredClientBuilder`]. The builder advertises which credential setters it
//! has and in which shape it takes each value; the connector probes those
//! capabilities at build time, applies what is supported and skips the rest.
//! Request models are created from positional arguments and optional fields
//! are only set when the model reports support for them.

use std::time::Duration;

use common_utils::{CustomResult, MinorUnit};
use domain_types::{connector_types::TransactionData, errors::SdkError};
use hyperswitch_masking::{Maskable, Secret};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CredentialField {
    DeveloperId,
    UserId,
    UserApiKey,
}

/// How a builder setter expects its value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialShape {
    /// Bare string
    Plain,
    /// Value tagged with the credential it belongs to
    Typed,
}

#[derive(Clone, Debug)]
pub enum CredentialValue {
    Plain(Secret<String>),
    Typed {
        field: CredentialField,
        value: Secret<String>,
    },
}

impl CredentialValue {
    pub fn for_shape(shape: CredentialShape, field: CredentialField, value: Secret<String>) -> Self {
        match shape {
            CredentialShape::Plain => Self::Plain(value),
            CredentialShape::Typed => Self::Typed { field, value },
        }
    }

    pub fn into_secret(self) -> Secret<String> {
        match self {
            Self::Plain(value) | Self::Typed { value, .. } => value,
        }
    }
}

pub trait StructuredClientBuilder: Send {
    /// Shape of the setter for `field`, `None` when the builder has no such setter
    fn credential_setter(&self, field: CredentialField) -> Option<CredentialShape>;

    fn set_credential(
        &mut self,
        field: CredentialField,
        value: CredentialValue,
    ) -> CustomResult<(), SdkError>;

    /// Whether extra headers can be attached to every outgoing call
    fn accepts_headers(&self) -> bool {
        false
    }

    fn add_headers(&mut self, _headers: Vec<(String, Maskable<String>)>) {}

    fn set_timeout(&mut self, _timeout: Duration) {}

    fn build(self: Box<Self>) -> CustomResult<Box<dyn StructuredClient>, SdkError>;
}

/// Typed request models a structured client can create
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
    SaleToken,
    SaleKeyed,
    AuthOnlyToken,
    AuthOnlyKeyed,
    AuthComplete,
    Refund,
}

/// Positional constructor argument of a request model
#[derive(Clone, Debug)]
pub enum RequestArg {
    Amount(MinorUnit),
    Text(Secret<String>),
}

/// Fields set on a request model after construction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum OptionalField {
    Cvv,
    OrderNumber,
    LocationId,
    TransactionAmount,
}

pub trait StructuredRequest: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> RequestKind;

    fn supports(&self, field: OptionalField) -> bool;

    fn set(&mut self, field: OptionalField, value: RequestArg) -> CustomResult<(), SdkError>;

    /// Wire body of the request. Secrets are exposed only here.
    fn encode(&self) -> CustomResult<serde_json::Value, SdkError>;
}

/// Transaction envelope returned by a structured client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    pub data: TransactionData,
}

#[async_trait::async_trait]
pub trait StructuredClient: Send + Sync {
    fn build_request(
        &self,
        kind: RequestKind,
        args: Vec<RequestArg>,
    ) -> CustomResult<Box<dyn StructuredRequest>, SdkError>;

    /// Sale and authorization requests
    async fn create_transaction(
        &self,
        request: Box<dyn StructuredRequest>,
    ) -> CustomResult<TransactionResponse, SdkError>;

    async fn auth_complete(
        &self,
        transaction_id: &str,
        request: Box<dyn StructuredRequest>,
    ) -> CustomResult<TransactionResponse, SdkError>;

    async fn refund_transaction(
        &self,
        transaction_id: &str,
        request: Box<dyn StructuredRequest>,
    ) -> CustomResult<TransactionResponse, SdkError>;

    async fn void_transaction(
        &self,
        transaction_id: &str,
    ) -> CustomResult<TransactionResponse, SdkError>;

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> CustomResult<TransactionResponse, SdkError>;
}
