pub mod transformers;

#[cfg(feature = "structured-client")]
pub mod structured;

use std::{fmt::Debug, sync::Arc};

use common_utils::{
    consts,
    ext_traits::{ByteSliceExt, Encode, StringExt},
    request::{Method, RequestBuilder},
    CustomResult, MinorUnit,
};
use domain_types::{
    connector_types::NormalizedResult,
    errors::{ApiClientError, ConnectorError, SdkError},
    payment_method_data::KeyedCard,
    types::{FortisCredentials, Proxy},
};
use error_stack::{report, ResultExt};
use external_services::service::{HttpTransport, ReqwestTransport};
use hyperswitch_masking::{ExposeInterface, Mask, Maskable, PeekInterface, Secret};
use interfaces::{
    api::FortisApi,
    structured_client::{
        CredentialField, CredentialValue, OptionalField, RequestArg, RequestKind,
        StructuredClient, StructuredClientBuilder, StructuredRequest, TransactionResponse,
    },
};
use serde_json::Value;
use transformers::{
    self as fortis, paths, FortisAmountRequest, FortisCardTokenRequest,
    FortisKeyedTransactionRequest, FortisTokenTransactionRequest, FortisVoidRequest,
};

use crate::utils::missing_field_err;

/// Fortis adapter: a typed client when one could be built, and a raw HTTP
/// transport that is always available as fallback.
///
/// Built once per gateway configuration and shared read-only between callers.
pub struct Fortis {
    credentials: FortisCredentials,
    structured: Option<Box<dyn StructuredClient>>,
    transport: Arc<dyn HttpTransport>,
}

impl Debug for Fortis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fortis")
            .field("credentials", &self.credentials)
            .field("structured", &self.structured.is_some())
            .finish()
    }
}

/// What to do after a typed-client attempt
enum StructuredOutcome {
    Done(NormalizedResult),
    Fallback,
}

impl Fortis {
    /// Assembles the client pair. A builder that cannot produce a client leaves
    /// the adapter on the HTTP path alone.
    pub fn new(
        credentials: FortisCredentials,
        transport: Arc<dyn HttpTransport>,
        structured_builder: Option<Box<dyn StructuredClientBuilder>>,
    ) -> Self {
        let structured = structured_builder
            .and_then(|builder| build_structured_client(&credentials, builder));
        Self {
            credentials,
            structured,
            transport,
        }
    }

    /// Production wiring: reqwest transport, plus the built-in typed client when
    /// the `structured-client` feature is enabled.
    pub fn from_config(
        credentials: FortisCredentials,
        proxy: &Proxy,
    ) -> CustomResult<Self, ApiClientError> {
        let transport: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(proxy, credentials.timeout())?);
        let builder = default_structured_builder(&credentials, Arc::clone(&transport));
        Ok(Self::new(credentials, transport, builder))
    }

    pub fn credentials(&self) -> &FortisCredentials {
        &self.credentials
    }

    pub fn has_structured_client(&self) -> bool {
        self.structured.is_some()
    }

    /// Vaults a card and returns the processor token id.
    #[tracing::instrument(skip_all, fields(operation = "create_card_token"))]
    pub async fn create_card_token(
        &self,
        card: &KeyedCard,
        account_holder_name: &str,
        location_id: Option<&str>,
    ) -> CustomResult<Secret<String>, ConnectorError> {
        let request = FortisCardTokenRequest {
            location_id: self
                .location_or_default(location_id)
                .ok_or_else(missing_field_err("location_id"))?,
            account_number: required_secret(&card.account_number, "account_number")?,
            exp_date: required_secret(&card.exp_date, "exp_date")?,
            account_holder_name: account_holder_name.to_string(),
        };
        let body = request
            .encode_to_value()
            .change_context(ConnectorError::RequestEncodingFailed)?;
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&self.url(paths::CARD_TOKEN))
            .headers(credential_headers(&self.credentials))
            .set_body(body)
            .build();

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|error| {
                let message = error.current_context().to_string();
                error.change_context(ConnectorError::CardTokenizationFailed(message))
            })?
            .map_err(|response| {
                report!(ConnectorError::CardTokenizationFailed(format!(
                    "unexpected response ({}): {}",
                    response.status_code,
                    String::from_utf8_lossy(&response.response)
                )))
            })?;

        let body = response
            .response
            .as_ref()
            .parse_struct::<Value>("FortisCardTokenResponse")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        fortis::token_id_from_response(&body)
            .map(Secret::new)
            .ok_or_else(|| {
                report!(ConnectorError::CardTokenizationFailed(format!(
                    "no token id in response ({}): {body}",
                    response.status_code
                )))
            })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.credentials.base_url(), path.trim_start_matches('/'))
    }

    fn location_or_default(&self, location_id: Option<&str>) -> Option<String> {
        location_id
            .and_then(StringExt::non_empty)
            .or_else(|| self.credentials.default_location_id().map(str::to_string))
    }

    /// Raw HTTP call with the credential headers. Never fails: transport problems
    /// become an `http` error entry.
    async fn fallback(&self, method: Method, path: &str, body: Option<Value>) -> NormalizedResult {
        let request = RequestBuilder::new()
            .method(method)
            .url(&self.url(path))
            .headers(credential_headers(&self.credentials))
            .set_optional_body(body)
            .build();

        match self.transport.send(request).await {
            Ok(outcome) => {
                let result = fortis::from_http_response(outcome);
                if let Some(errors) = result.errors() {
                    tracing::info!(path, ?errors, "processor returned errors");
                }
                result
            }
            Err(error) => {
                tracing::error!(path, ?error, "fallback transport failed");
                fortis::from_transport_error(error.current_context())
            }
        }
    }

    /// Processor errors end the operation as a normalized result. Failures raised
    /// before any request left the process send it down the HTTP path instead,
    /// except rejected credentials in strict mode.
    fn settle(
        &self,
        attempt: CustomResult<TransactionResponse, SdkError>,
    ) -> CustomResult<StructuredOutcome, ConnectorError> {
        let error = match attempt {
            Ok(response) => return Ok(StructuredOutcome::Done(fortis::to_normalized(&response))),
            Err(error) => error,
        };

        match error.current_context() {
            SdkError::AuthValidation(message) if self.credentials.strict => {
                let message = message.clone();
                Err(error.change_context(ConnectorError::CredentialSetupFailed(message)))
            }
            SdkError::AuthValidation(_) => {
                tracing::warn!(?error, "typed client rejected credentials, using HTTP fallback");
                Ok(StructuredOutcome::Fallback)
            }
            sdk_error @ SdkError::Api { .. } => {
                tracing::info!(code = sdk_error.code(), "processor returned an error");
                Ok(StructuredOutcome::Done(fortis::error_from_sdk(sdk_error)))
            }
            SdkError::InvalidArguments(_) | SdkError::Construction(_) => {
                tracing::warn!(?error, "typed request could not be built, using HTTP fallback");
                Ok(StructuredOutcome::Fallback)
            }
        }
    }

    /// Typed request with two constructor layouts tried in order, then optional
    /// fields set where the model supports them.
    fn build_structured_request(
        client: &dyn StructuredClient,
        kind: RequestKind,
        layouts: [Vec<RequestArg>; 2],
        optional_fields: Vec<(OptionalField, RequestArg)>,
    ) -> CustomResult<Box<dyn StructuredRequest>, SdkError> {
        let [preferred, alternate] = layouts;
        let mut request = match client.build_request(kind, preferred) {
            Ok(request) => request,
            Err(error) => {
                tracing::debug!(%kind, ?error, "retrying request model with alternate argument order");
                client.build_request(kind, alternate)?
            }
        };
        for (field, value) in optional_fields {
            if request.supports(field) {
                request.set(field, value)?;
            }
        }
        Ok(request)
    }

    async fn structured_transaction(
        &self,
        client: &dyn StructuredClient,
        kind: RequestKind,
        layouts: [Vec<RequestArg>; 2],
        optional_fields: Vec<(OptionalField, RequestArg)>,
    ) -> CustomResult<TransactionResponse, SdkError> {
        let request = Self::build_structured_request(client, kind, layouts, optional_fields)?;
        client.create_transaction(request).await
    }

    async fn token_transaction(
        &self,
        kind: RequestKind,
        path: &str,
        token_id: &Secret<String>,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        let token_id = required_secret(token_id, "token_id")?;
        let amount = non_negative(amount)?;
        let order_number = order_number.and_then(StringExt::non_empty);
        let location_id = self.location_or_default(location_id);

        if let Some(client) = self.structured.as_deref() {
            let attempt = self
                .structured_transaction(
                    client,
                    kind,
                    [
                        vec![RequestArg::Amount(amount), RequestArg::Text(token_id.clone())],
                        vec![RequestArg::Text(token_id.clone()), RequestArg::Amount(amount)],
                    ],
                    reference_fields(order_number.as_deref(), location_id.as_deref()),
                )
                .await;
            if let StructuredOutcome::Done(result) = self.settle(attempt)? {
                return Ok(result);
            }
        }

        let body = FortisTokenTransactionRequest {
            token_id,
            transaction_amount: amount,
            order_number,
            location_id,
        }
        .encode_to_value()
        .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok(self.fallback(Method::Post, path, Some(body)).await)
    }

    async fn keyed_transaction(
        &self,
        kind: RequestKind,
        path: &str,
        card: &KeyedCard,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        let card = KeyedCard {
            account_number: required_secret(&card.account_number, "account_number")?,
            exp_date: required_secret(&card.exp_date, "exp_date")?,
            cvv: card
                .cvv
                .as_ref()
                .and_then(|cvv| cvv.peek().as_str().non_empty())
                .map(Secret::new),
        };
        let amount = non_negative(amount)?;
        let order_number = order_number.and_then(StringExt::non_empty);
        let location_id = self.location_or_default(location_id);

        if let Some(client) = self.structured.as_deref() {
            let mut optional_fields = Vec::new();
            if let Some(cvv) = &card.cvv {
                optional_fields.push((OptionalField::Cvv, RequestArg::Text(cvv.clone())));
            }
            optional_fields.extend(reference_fields(
                order_number.as_deref(),
                location_id.as_deref(),
            ));
            let pan = RequestArg::Text(card.account_number.clone());
            let exp_date = RequestArg::Text(card.exp_date.clone());
            let attempt = self
                .structured_transaction(
                    client,
                    kind,
                    [
                        vec![RequestArg::Amount(amount), pan.clone(), exp_date.clone()],
                        vec![pan, exp_date, RequestArg::Amount(amount)],
                    ],
                    optional_fields,
                )
                .await;
            if let StructuredOutcome::Done(result) = self.settle(attempt)? {
                return Ok(result);
            }
        }

        let body = FortisKeyedTransactionRequest::new(&card, amount, order_number, location_id)
            .encode_to_value()
            .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok(self.fallback(Method::Post, path, Some(body)).await)
    }

    /// auth-complete and refund: amount-only models
    async fn amount_update(
        &self,
        kind: RequestKind,
        transaction_id: &str,
        amount: MinorUnit,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        let amount = non_negative(amount)?;
        let transaction_id = match fortis::transaction_id_segment(transaction_id) {
            Ok(transaction_id) => transaction_id,
            Err(result) => {
                tracing::info!(%kind, "unusable transaction id, skipping processor call");
                return Ok(result);
            }
        };
        let path = match kind {
            RequestKind::Refund => paths::refund(&transaction_id),
            _ => paths::auth_complete(&transaction_id),
        };

        if let Some(client) = self.structured.as_deref() {
            let attempt: CustomResult<TransactionResponse, SdkError> = async {
                let request = Self::build_structured_request(
                    client,
                    kind,
                    [vec![RequestArg::Amount(amount)], Vec::new()],
                    vec![(OptionalField::TransactionAmount, RequestArg::Amount(amount))],
                )?;
                match kind {
                    RequestKind::Refund => client.refund_transaction(&transaction_id, request).await,
                    _ => client.auth_complete(&transaction_id, request).await,
                }
            }
            .await;
            if let StructuredOutcome::Done(result) = self.settle(attempt)? {
                return Ok(result);
            }
        }

        let body = FortisAmountRequest {
            transaction_amount: Some(amount),
        }
        .encode_to_value()
        .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok(self.fallback(Method::Post, &path, Some(body)).await)
    }
}

#[async_trait::async_trait]
impl FortisApi for Fortis {
    #[tracing::instrument(skip_all, fields(operation = "sale_tokenized"))]
    async fn sale_tokenized(
        &self,
        token_id: &Secret<String>,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        self.token_transaction(
            RequestKind::SaleToken,
            paths::SALE_TOKEN,
            token_id,
            amount,
            order_number,
            location_id,
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(operation = "sale_keyed"))]
    async fn sale_keyed(
        &self,
        card: &KeyedCard,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        self.keyed_transaction(
            RequestKind::SaleKeyed,
            paths::SALE_KEYED,
            card,
            amount,
            order_number,
            location_id,
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(operation = "authorize_tokenized"))]
    async fn authorize_tokenized(
        &self,
        token_id: &Secret<String>,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        self.token_transaction(
            RequestKind::AuthOnlyToken,
            paths::AUTH_ONLY_TOKEN,
            token_id,
            amount,
            order_number,
            location_id,
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(operation = "authorize_keyed"))]
    async fn authorize_keyed(
        &self,
        card: &KeyedCard,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        self.keyed_transaction(
            RequestKind::AuthOnlyKeyed,
            paths::AUTH_ONLY_KEYED,
            card,
            amount,
            order_number,
            location_id,
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(operation = "capture"))]
    async fn capture(
        &self,
        transaction_id: &str,
        amount: MinorUnit,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        self.amount_update(RequestKind::AuthComplete, transaction_id, amount)
            .await
    }

    #[tracing::instrument(skip_all, fields(operation = "void"))]
    async fn void(&self, transaction_id: &str) -> CustomResult<NormalizedResult, ConnectorError> {
        let transaction_id = match fortis::transaction_id_segment(transaction_id) {
            Ok(transaction_id) => transaction_id,
            Err(result) => {
                tracing::info!("unusable transaction id, skipping processor call");
                return Ok(result);
            }
        };

        if let Some(client) = self.structured.as_deref() {
            let attempt = client.void_transaction(&transaction_id).await;
            if let StructuredOutcome::Done(result) = self.settle(attempt)? {
                return Ok(result);
            }
        }

        let body = FortisVoidRequest::default()
            .encode_to_value()
            .change_context(ConnectorError::RequestEncodingFailed)?;
        Ok(self
            .fallback(Method::Post, &paths::void(&transaction_id), Some(body))
            .await)
    }

    #[tracing::instrument(skip_all, fields(operation = "refund"))]
    async fn refund(
        &self,
        transaction_id: &str,
        amount: MinorUnit,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        self.amount_update(RequestKind::Refund, transaction_id, amount)
            .await
    }

    #[tracing::instrument(skip_all, fields(operation = "get"))]
    async fn get(&self, transaction_id: &str) -> CustomResult<NormalizedResult, ConnectorError> {
        let transaction_id = match fortis::transaction_id_segment(transaction_id) {
            Ok(transaction_id) => transaction_id,
            Err(result) => {
                tracing::info!("unusable transaction id, skipping processor call");
                return Ok(result);
            }
        };

        if let Some(client) = self.structured.as_deref() {
            let attempt = client.get_transaction(&transaction_id).await;
            if let StructuredOutcome::Done(result) = self.settle(attempt)? {
                return Ok(result);
            }
        }

        Ok(self
            .fallback(Method::Get, &paths::transaction(&transaction_id), None)
            .await)
    }
}

/// Credential headers sent on every fallback call and handed to typed clients
/// that accept extra headers.
pub fn credential_headers(credentials: &FortisCredentials) -> Vec<(String, Maskable<String>)> {
    vec![
        (
            consts::CONTENT_TYPE.to_string(),
            consts::APPLICATION_JSON.to_string().into(),
        ),
        (
            consts::ACCEPT.to_string(),
            consts::APPLICATION_JSON.to_string().into(),
        ),
        (
            consts::DEVELOPER_ID.to_string(),
            credentials.developer_id.clone().into(),
        ),
        (consts::USER_ID.to_string(), credentials.user_id.clone().into()),
        (
            consts::USER_API_KEY.to_string(),
            credentials.user_api_key.clone().expose().into_masked(),
        ),
    ]
}

/// Probes the builder once. Each credential with a setter is applied in the shape
/// the setter asks for; a failing setter is ignored. A failed build leaves the
/// adapter without a typed client.
fn build_structured_client(
    credentials: &FortisCredentials,
    mut builder: Box<dyn StructuredClientBuilder>,
) -> Option<Box<dyn StructuredClient>> {
    let values = [
        (
            CredentialField::DeveloperId,
            Secret::new(credentials.developer_id.clone()),
        ),
        (
            CredentialField::UserId,
            Secret::new(credentials.user_id.clone()),
        ),
        (
            CredentialField::UserApiKey,
            credentials.user_api_key.clone(),
        ),
    ];
    for (field, value) in values {
        match builder.credential_setter(field) {
            Some(shape) => {
                if let Err(error) =
                    builder.set_credential(field, CredentialValue::for_shape(shape, field, value))
                {
                    tracing::warn!(%field, ?error, "ignoring failed credential setter");
                }
            }
            None => tracing::debug!(%field, "typed client has no setter for credential"),
        }
    }

    if builder.accepts_headers() {
        builder.add_headers(credential_headers(credentials));
    }
    builder.set_timeout(credentials.timeout());

    match builder.build() {
        Ok(client) => Some(client),
        Err(error) => {
            tracing::warn!(?error, "typed client unavailable, using HTTP fallback only");
            None
        }
    }
}

#[cfg(feature = "structured-client")]
fn default_structured_builder(
    credentials: &FortisCredentials,
    transport: Arc<dyn HttpTransport>,
) -> Option<Box<dyn StructuredClientBuilder>> {
    Some(Box::new(structured::FortisSdkClientBuilder::new(
        credentials.base_url(),
        transport,
    )))
}

#[cfg(not(feature = "structured-client"))]
fn default_structured_builder(
    _credentials: &FortisCredentials,
    _transport: Arc<dyn HttpTransport>,
) -> Option<Box<dyn StructuredClientBuilder>> {
    None
}

fn reference_fields(
    order_number: Option<&str>,
    location_id: Option<&str>,
) -> Vec<(OptionalField, RequestArg)> {
    [
        (OptionalField::OrderNumber, order_number),
        (OptionalField::LocationId, location_id),
    ]
    .into_iter()
    .filter_map(|(field, value)| {
        value.map(|value| (field, RequestArg::Text(Secret::new(value.to_string()))))
    })
    .collect()
}

fn required_secret(
    value: &Secret<String>,
    field_name: &'static str,
) -> CustomResult<Secret<String>, ConnectorError> {
    value
        .peek()
        .as_str()
        .non_empty()
        .map(Secret::new)
        .ok_or_else(missing_field_err(field_name))
}

fn non_negative(amount: MinorUnit) -> CustomResult<MinorUnit, ConnectorError> {
    amount.ensure_non_negative().map_err(|error| {
        let message = error.current_context().to_string();
        error.change_context(ConnectorError::InvalidArgument {
            field_name: "transaction_amount",
            message,
        })
    })
}
