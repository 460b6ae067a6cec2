#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use common_utils::{request::Method, CustomResult, Request};
use domain_types::{
    errors::{ApiClientError, SdkError},
    router_response_types::Response,
    types::FortisCredentials,
};
use error_stack::report;
use external_services::service::HttpTransport;
use hyperswitch_masking::{Maskable, Secret};
use interfaces::structured_client::{
    CredentialField, CredentialShape, CredentialValue, RequestArg, RequestKind, StructuredClient,
    StructuredClientBuilder, StructuredRequest, TransactionResponse,
};
use serde_json::{json, Value};

pub const SANDBOX: &str = "https://api.sandbox.fortis.tech";

pub fn credentials() -> FortisCredentials {
    FortisCredentials::new("dev_123", "user_456", Secret::new("key_789".into()))
        .with_location_id(Some("loc_default".into()))
}

pub fn sale_response() -> Value {
    json!({"data": {"id": "tx_1", "type": "sale", "status_code": 1000}})
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

pub enum Reply {
    Json(u16, Value),
    Raw(u16, &'static str),
    Fail(ApiClientError),
}

/// Answers queued replies in order, then repeats the default reply
pub struct RecordingTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    replies: Mutex<VecDeque<Reply>>,
    default_reply: Value,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Self::answering(sale_response())
    }

    pub fn answering(default_reply: Value) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            default_reply,
        })
    }

    pub fn queue(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

fn response(status_code: u16, body: Vec<u8>) -> Result<Response, Response> {
    let response = Response {
        headers: None,
        response: body.into(),
        status_code,
    };
    if response.is_success() {
        Ok(response)
    } else {
        Err(response)
    }
}

#[async_trait::async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            headers: request.get_headers_map(),
            body: request.body.as_ref().map(|body| body.as_json().clone()),
        });
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Json(status, body)) => Ok(response(status, body.to_string().into_bytes())),
            Some(Reply::Raw(status, body)) => Ok(response(status, body.as_bytes().to_vec())),
            Some(Reply::Fail(error)) => Err(report!(error)),
            None => Ok(response(200, self.default_reply.to_string().into_bytes())),
        }
    }
}

/// What a fake typed client does when called
#[derive(Clone)]
pub enum Behaviour {
    Respond(Value),
    RejectCredentials,
    ApiError(SdkError),
}

#[derive(Default)]
pub struct ClientLog {
    pub build_attempts: Vec<(RequestKind, usize, bool)>,
    pub bodies: Vec<Value>,
    pub transaction_ids: Vec<String>,
    pub credentials: Vec<(CredentialField, bool)>,
    pub headers: Vec<String>,
}

/// Typed client stand-in. `amount_first` picks the constructor layout it accepts.
pub struct FakeBuilder {
    pub behaviour: Behaviour,
    pub amount_first: bool,
    pub fail_build: bool,
    pub shapes: HashMap<CredentialField, Option<CredentialShape>>,
    pub failing_setter: Option<CredentialField>,
    pub log: Arc<Mutex<ClientLog>>,
}

impl FakeBuilder {
    pub fn new(behaviour: Behaviour) -> (Box<Self>, Arc<Mutex<ClientLog>>) {
        let log = Arc::new(Mutex::new(ClientLog::default()));
        (
            Box::new(Self {
                behaviour,
                amount_first: true,
                fail_build: false,
                shapes: HashMap::new(),
                failing_setter: None,
                log: Arc::clone(&log),
            }),
            log,
        )
    }
}

impl StructuredClientBuilder for FakeBuilder {
    fn credential_setter(&self, field: CredentialField) -> Option<CredentialShape> {
        self.shapes
            .get(&field)
            .copied()
            .unwrap_or(Some(CredentialShape::Plain))
    }

    fn set_credential(
        &mut self,
        field: CredentialField,
        value: CredentialValue,
    ) -> CustomResult<(), SdkError> {
        if self.failing_setter == Some(field) {
            return Err(report!(SdkError::Construction(format!("{field} setter blew up"))));
        }
        let typed = matches!(value, CredentialValue::Typed { .. });
        self.log.lock().unwrap().credentials.push((field, typed));
        Ok(())
    }

    fn accepts_headers(&self) -> bool {
        true
    }

    fn add_headers(&mut self, headers: Vec<(String, Maskable<String>)>) {
        self.log
            .lock()
            .unwrap()
            .headers
            .extend(headers.into_iter().map(|(name, _)| name));
    }

    fn build(self: Box<Self>) -> CustomResult<Box<dyn StructuredClient>, SdkError> {
        if self.fail_build {
            return Err(report!(SdkError::Construction("no client".into())));
        }
        Ok(Box::new(FakeClient {
            behaviour: self.behaviour,
            amount_first: self.amount_first,
            log: self.log,
        }))
    }
}

pub struct FakeClient {
    behaviour: Behaviour,
    amount_first: bool,
    log: Arc<Mutex<ClientLog>>,
}

#[derive(Debug)]
struct FakeRequest {
    kind: RequestKind,
    body: serde_json::Map<String, Value>,
}

impl StructuredRequest for FakeRequest {
    fn kind(&self) -> RequestKind {
        self.kind
    }

    fn supports(&self, field: interfaces::structured_client::OptionalField) -> bool {
        !matches!(
            field,
            interfaces::structured_client::OptionalField::LocationId
        )
    }

    fn set(
        &mut self,
        field: interfaces::structured_client::OptionalField,
        value: RequestArg,
    ) -> CustomResult<(), SdkError> {
        self.body.insert(field.to_string(), arg_value(&value));
        Ok(())
    }

    fn encode(&self) -> CustomResult<Value, SdkError> {
        Ok(Value::Object(self.body.clone()))
    }
}

fn arg_value(arg: &RequestArg) -> Value {
    use hyperswitch_masking::PeekInterface;
    match arg {
        RequestArg::Amount(amount) => json!(amount.get_amount_as_i64()),
        RequestArg::Text(text) => json!(text.peek()),
    }
}

impl FakeClient {
    fn answer(&self) -> CustomResult<TransactionResponse, SdkError> {
        match &self.behaviour {
            Behaviour::Respond(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
            Behaviour::RejectCredentials => Err(report!(SdkError::AuthValidation(
                "user-api-key is required".into()
            ))),
            Behaviour::ApiError(error) => Err(report!(error.clone())),
        }
    }

    fn record(&self, transaction_id: Option<&str>, request: Option<Box<dyn StructuredRequest>>) {
        let mut log = self.log.lock().unwrap();
        if let Some(id) = transaction_id {
            log.transaction_ids.push(id.to_string());
        }
        if let Some(request) = request {
            log.bodies.push(request.encode().unwrap());
        }
    }
}

#[async_trait::async_trait]
impl StructuredClient for FakeClient {
    fn build_request(
        &self,
        kind: RequestKind,
        args: Vec<RequestArg>,
    ) -> CustomResult<Box<dyn StructuredRequest>, SdkError> {
        let amount_leads = matches!(args.first(), Some(RequestArg::Amount(_)));
        let accepted = args.is_empty() || amount_leads == self.amount_first;
        self.log
            .lock()
            .unwrap()
            .build_attempts
            .push((kind, args.len(), accepted));
        if !accepted {
            return Err(report!(SdkError::InvalidArguments("wrong order".into())));
        }
        let body = args
            .iter()
            .enumerate()
            .map(|(position, arg)| (format!("arg{position}"), arg_value(arg)))
            .collect();
        Ok(Box::new(FakeRequest { kind, body }))
    }

    async fn create_transaction(
        &self,
        request: Box<dyn StructuredRequest>,
    ) -> CustomResult<TransactionResponse, SdkError> {
        self.record(None, Some(request));
        self.answer()
    }

    async fn auth_complete(
        &self,
        transaction_id: &str,
        request: Box<dyn StructuredRequest>,
    ) -> CustomResult<TransactionResponse, SdkError> {
        self.record(Some(transaction_id), Some(request));
        self.answer()
    }

    async fn refund_transaction(
        &self,
        transaction_id: &str,
        request: Box<dyn StructuredRequest>,
    ) -> CustomResult<TransactionResponse, SdkError> {
        self.record(Some(transaction_id), Some(request));
        self.answer()
    }

    async fn void_transaction(
        &self,
        transaction_id: &str,
    ) -> CustomResult<TransactionResponse, SdkError> {
        self.record(Some(transaction_id), None);
        self.answer()
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> CustomResult<TransactionResponse, SdkError> {
        self.record(Some(transaction_id), None);
        self.answer()
    }
}
