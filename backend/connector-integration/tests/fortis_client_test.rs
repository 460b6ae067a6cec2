#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use common::{credentials, Behaviour, FakeBuilder, RecordingTransport, Reply, SANDBOX};
use common_utils::{request::Method, MinorUnit};
use connector_integration::{
    connectors::fortis::transformers::{resolve_status, resolve_stored_status},
    Fortis,
};
use domain_types::{
    connector_types::{LifecycleStatus, NormalizedResult},
    errors::{ApiClientError, ConnectorError, SdkError},
    payment_method_data::KeyedCard,
};
use hyperswitch_masking::Secret;
use interfaces::{
    api::FortisApi,
    structured_client::{CredentialField, CredentialShape, RequestKind},
};
use serde_json::json;

fn token(value: &str) -> Secret<String> {
    Secret::new(value.to_string())
}

fn card(cvv: Option<&str>) -> KeyedCard {
    KeyedCard {
        account_number: token("4111111111111111"),
        exp_date: token("1230"),
        cvv: cvv.map(token),
    }
}

fn http_only(transport: &Arc<RecordingTransport>) -> Fortis {
    Fortis::new(credentials(), transport.clone(), None)
}

#[tokio::test]
async fn tokenized_sale_posts_documented_body() {
    let transport = RecordingTransport::new();
    let fortis = http_only(&transport);

    let result = fortis
        .sale_tokenized(&token("tok_abc"), MinorUnit::new(1234), Some("ORDER-1"), None)
        .await
        .unwrap();

    let request = transport.last();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, format!("{SANDBOX}/v1/transactions/cc/sale/token"));
    assert_eq!(
        request.body,
        Some(json!({
            "token_id": "tok_abc",
            "transaction_amount": 1234,
            "order_number": "ORDER-1",
            "location_id": "loc_default"
        }))
    );
    assert_eq!(result.transaction_id(), Some("tx_1"));
    assert_eq!(resolve_status(Some(&result)), LifecycleStatus::Captured);
}

#[tokio::test]
async fn fallback_sends_credential_headers() {
    let transport = RecordingTransport::new();
    let fortis = http_only(&transport);

    fortis.get("tx_1").await.unwrap();

    let headers = transport.last().headers;
    assert_eq!(headers.get("content-type").map(String::as_str), Some("application/json"));
    assert_eq!(headers.get("accept").map(String::as_str), Some("application/json"));
    assert_eq!(headers.get("developer-id").map(String::as_str), Some("dev_123"));
    assert_eq!(headers.get("user-id").map(String::as_str), Some("user_456"));
    assert_eq!(headers.get("user-api-key").map(String::as_str), Some("key_789"));
}

#[tokio::test]
async fn keyed_operations_omit_blank_optional_fields() {
    let transport = RecordingTransport::new();
    let fortis = http_only(&transport);

    fortis
        .sale_keyed(&card(Some(" ")), MinorUnit::new(500), Some(""), Some("loc_9"))
        .await
        .unwrap();
    let request = transport.last();
    assert_eq!(request.url, format!("{SANDBOX}/v1/transactions/cc/sale/keyed"));
    assert_eq!(
        request.body,
        Some(json!({
            "account_number": "4111111111111111",
            "exp_date": "1230",
            "transaction_amount": 500,
            "location_id": "loc_9"
        }))
    );

    fortis
        .authorize_keyed(&card(Some("123")), MinorUnit::new(700), None, None)
        .await
        .unwrap();
    let request = transport.last();
    assert_eq!(
        request.url,
        format!("{SANDBOX}/v1/transactions/cc/auth-only/keyed")
    );
    assert_eq!(request.body.as_ref().and_then(|b| b.get("cvv")), Some(&json!("123")));
    assert_eq!(request.body.as_ref().and_then(|b| b.get("order_number")), None);
}

#[tokio::test]
async fn id_based_operations_use_transaction_paths() {
    let transport = RecordingTransport::new();
    let fortis = http_only(&transport);

    fortis
        .authorize_tokenized(&token("tok_abc"), MinorUnit::new(900), None, None)
        .await
        .unwrap();
    fortis.capture("tx_9", MinorUnit::new(900)).await.unwrap();
    fortis.void("tx_9").await.unwrap();
    fortis.refund("tx_9", MinorUnit::new(300)).await.unwrap();
    fortis.get("tx_9").await.unwrap();

    let requests = transport.requests();
    let seen = requests
        .iter()
        .map(|request| (request.method, request.url.clone(), request.body.clone()))
        .collect::<Vec<_>>();
    assert_eq!(
        seen,
        vec![
            (
                Method::Post,
                format!("{SANDBOX}/v1/transactions/cc/auth-only/token"),
                Some(json!({
                    "token_id": "tok_abc",
                    "transaction_amount": 900,
                    "location_id": "loc_default"
                })),
            ),
            (
                Method::Post,
                format!("{SANDBOX}/v1/transactions/tx_9/auth-complete"),
                Some(json!({"transaction_amount": 900})),
            ),
            (
                Method::Post,
                format!("{SANDBOX}/v1/transactions/tx_9/void"),
                Some(json!({})),
            ),
            (
                Method::Post,
                format!("{SANDBOX}/v1/transactions/tx_9/refund"),
                Some(json!({"transaction_amount": 300})),
            ),
            (Method::Get, format!("{SANDBOX}/v1/transactions/tx_9"), None),
        ]
    );
}

#[tokio::test]
async fn missing_transaction_id_is_answered_locally() {
    let transport = RecordingTransport::new();
    let fortis = http_only(&transport);
    let expected = json!({"errors": {"transaction": ["Missing transaction id"]}, "code": 0});

    let results = vec![
        fortis.capture("", MinorUnit::new(100)).await.unwrap(),
        fortis.void("").await.unwrap(),
        fortis.refund("  ", MinorUnit::new(100)).await.unwrap(),
        fortis.get("").await.unwrap(),
    ];

    for result in results {
        assert_eq!(result.to_value(), expected);
        assert_eq!(resolve_status(Some(&result)), LifecycleStatus::Failed);
    }
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn transaction_ids_unsafe_in_a_path_are_answered_locally() {
    let transport = RecordingTransport::new();
    let (builder, log) = FakeBuilder::new(Behaviour::Respond(json!({
        "data": {"id": "tx_1", "type": "sale", "status_code": 1000}
    })));
    let typed = Fortis::new(credentials(), transport.clone(), Some(builder));
    let fortis = http_only(&transport);
    let expected = json!({"errors": {"transaction": ["Invalid transaction id"]}, "code": 0});

    let results = vec![
        fortis.capture("tx_1/void", MinorUnit::new(100)).await.unwrap(),
        fortis.void("../tokens/cc").await.unwrap(),
        fortis.refund("tx_1?amount=1", MinorUnit::new(100)).await.unwrap(),
        fortis.get("tx 1").await.unwrap(),
        typed.void("tx_1/refund").await.unwrap(),
        typed.get("tx_1#x").await.unwrap(),
    ];

    for result in results {
        assert_eq!(result.to_value(), expected);
    }
    assert_eq!(transport.calls(), 0);
    assert!(log.lock().unwrap().transaction_ids.is_empty());

    fortis.get(" tx-1_A ").await.unwrap();
    assert_eq!(transport.last().url, format!("{SANDBOX}/v1/transactions/tx-1_A"));
}

#[tokio::test]
async fn programmer_errors_are_raised_before_io() {
    let transport = RecordingTransport::new();
    let fortis = http_only(&transport);

    let error = fortis
        .sale_tokenized(&token(""), MinorUnit::new(100), None, None)
        .await
        .unwrap_err();
    assert_eq!(
        error.current_context(),
        &ConnectorError::MissingRequiredField {
            field_name: "token_id"
        }
    );

    let error = fortis
        .authorize_keyed(
            &KeyedCard {
                exp_date: token(""),
                ..card(None)
            },
            MinorUnit::new(100),
            None,
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(
        error.current_context(),
        &ConnectorError::MissingRequiredField {
            field_name: "exp_date"
        }
    );

    let error = fortis
        .refund("tx_1", MinorUnit::new(-5))
        .await
        .unwrap_err();
    assert!(matches!(
        error.current_context(),
        ConnectorError::InvalidArgument {
            field_name: "transaction_amount",
            ..
        }
    ));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn get_is_repeatable() {
    let transport = RecordingTransport::new();
    let fortis = http_only(&transport);

    let first = fortis.get("tx_1").await.unwrap();
    let second = fortis.get("tx_1").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn refund_returns_refund_transaction() {
    let transport =
        RecordingTransport::answering(json!({"data": {"id": "rf_1", "type": "refund", "status_code": 1000}}));
    let fortis = http_only(&transport);

    let result = fortis.refund("tx_1", MinorUnit::new(500)).await.unwrap();

    assert_eq!(result.transaction_id(), Some("rf_1"));
    assert!(transport.last().url.ends_with("/v1/transactions/tx_1/refund"));
}

#[tokio::test]
async fn processor_error_status_keeps_processor_errors() {
    let transport = RecordingTransport::new();
    transport.queue(Reply::Json(
        422,
        json!({"errors": {"account_number": ["blocked in unit tests"]}}),
    ));
    transport.queue(Reply::Raw(502, "<html>bad gateway</html>"));
    let fortis = http_only(&transport);

    let declined = fortis
        .sale_keyed(&card(None), MinorUnit::new(100), None, None)
        .await
        .unwrap();
    assert_eq!(
        declined.to_value(),
        json!({"errors": {"account_number": ["blocked in unit tests"]}, "code": 422})
    );

    let gateway = fortis.get("tx_1").await.unwrap();
    assert_eq!(
        gateway,
        NormalizedResult::http_error("Processor responded with HTTP status 502", 502)
    );
}

#[tokio::test]
async fn transport_failure_becomes_http_error() {
    let transport = RecordingTransport::new();
    transport.queue(Reply::Fail(ApiClientError::RequestTimeoutReceived));
    let fortis = http_only(&transport);

    let result = fortis.void("tx_1").await.unwrap();

    assert_eq!(result.errors().map(|errors| errors.contains_key("http")), Some(true));
    assert_eq!(result.to_value()["code"], json!(0));
    assert_eq!(resolve_status(Some(&result)), LifecycleStatus::Failed);
}

#[tokio::test]
async fn success_body_with_errors_is_a_failure() {
    let transport = RecordingTransport::answering(json!({
        "data": {"id": "tx_1", "status_code": 1000},
        "errors": {"cvv": ["mismatch"]}
    }));
    let fortis = http_only(&transport);

    let result = fortis
        .sale_tokenized(&token("tok_abc"), MinorUnit::new(100), None, None)
        .await
        .unwrap();

    assert_eq!(result.data(), None);
    assert_eq!(resolve_status(Some(&result)), LifecycleStatus::Failed);
}

#[tokio::test]
async fn typed_client_handles_operation_without_http() {
    let transport = RecordingTransport::new();
    let (builder, log) = FakeBuilder::new(Behaviour::Respond(json!({
        "type": "Transaction",
        "data": {"id": "tx_auth", "type": "auth", "status_code": 1000}
    })));
    let fortis = Fortis::new(credentials(), transport.clone(), Some(builder));
    assert!(fortis.has_structured_client());

    let result = fortis
        .authorize_tokenized(&token("tok_abc"), MinorUnit::new(2500), Some("ORDER-7"), None)
        .await
        .unwrap();

    assert_eq!(transport.calls(), 0);
    assert_eq!(result.transaction_id(), Some("tx_auth"));
    assert_eq!(resolve_status(Some(&result)), LifecycleStatus::Authorized);

    let log = log.lock().unwrap();
    assert_eq!(
        log.bodies,
        vec![json!({"arg0": 2500, "arg1": "tok_abc", "order_number": "ORDER-7"})]
    );
    assert!(log.headers.contains(&"user-api-key".to_string()));
}

#[tokio::test]
async fn typed_request_retries_alternate_argument_order() {
    let transport = RecordingTransport::new();
    let (mut builder, log) = FakeBuilder::new(Behaviour::Respond(json!({
        "data": {"id": "tx_keyed", "type": "sale", "status_code": 1000}
    })));
    builder.amount_first = false;
    let fortis = Fortis::new(credentials(), transport.clone(), Some(builder));

    fortis
        .sale_keyed(&card(Some("999")), MinorUnit::new(100), None, None)
        .await
        .unwrap();

    assert_eq!(transport.calls(), 0);
    let log = log.lock().unwrap();
    assert_eq!(
        log.build_attempts,
        vec![
            (RequestKind::SaleKeyed, 3, false),
            (RequestKind::SaleKeyed, 3, true)
        ]
    );
    assert_eq!(
        log.bodies,
        vec![json!({"arg0": "4111111111111111", "arg1": "1230", "arg2": 100, "cvv": "999"})]
    );
}

#[tokio::test]
async fn rejected_credentials_fall_back_to_http() {
    let transport = RecordingTransport::new();
    let (builder, _log) = FakeBuilder::new(Behaviour::RejectCredentials);
    let fortis = Fortis::new(credentials(), transport.clone(), Some(builder));

    let result = fortis
        .sale_tokenized(&token("tok_abc"), MinorUnit::new(100), None, None)
        .await
        .unwrap();
    fortis.get("tx_1").await.unwrap();

    assert_eq!(result.transaction_id(), Some("tx_1"));
    assert_eq!(transport.calls(), 2);
    assert_eq!(transport.last().method, Method::Get);
}

#[tokio::test]
async fn strict_mode_surfaces_rejected_credentials() {
    let transport = RecordingTransport::new();
    let (builder, _log) = FakeBuilder::new(Behaviour::RejectCredentials);
    let fortis = Fortis::new(credentials().with_strict(true), transport.clone(), Some(builder));

    let error = fortis
        .capture("tx_1", MinorUnit::new(100))
        .await
        .unwrap_err();

    assert!(matches!(
        error.current_context(),
        ConnectorError::CredentialSetupFailed(_)
    ));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn processor_error_from_typed_client_is_not_retried() {
    let transport = RecordingTransport::new();
    let (builder, _log) = FakeBuilder::new(Behaviour::ApiError(SdkError::Api {
        code: 400,
        message: "HTTP Response Not OK. Status code: 400".into(),
        raw_body: Some(r#"{"errors":{"transaction_amount":["must be positive"]}}"#.into()),
    }));
    let fortis = Fortis::new(credentials(), transport.clone(), Some(builder));

    let result = fortis.refund("tx_1", MinorUnit::new(0)).await.unwrap();

    assert_eq!(
        result.to_value(),
        json!({"errors": {"transaction_amount": ["must be positive"]}, "code": 400})
    );
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn typed_client_exception_without_body_becomes_api_error() {
    let transport = RecordingTransport::new();
    let (builder, _log) = FakeBuilder::new(Behaviour::ApiError(SdkError::Api {
        code: 503,
        message: "Service Unavailable".into(),
        raw_body: None,
    }));
    let fortis = Fortis::new(credentials(), transport.clone(), Some(builder));

    let result = fortis.void("tx_1").await.unwrap();

    assert_eq!(
        result,
        NormalizedResult::error("api", "Service Unavailable", 503)
    );
}

#[tokio::test]
async fn failed_builder_leaves_http_only_adapter() {
    let transport = RecordingTransport::new();
    let (mut builder, _log) = FakeBuilder::new(Behaviour::RejectCredentials);
    builder.fail_build = true;
    let fortis = Fortis::new(credentials(), transport.clone(), Some(builder));

    assert!(!fortis.has_structured_client());
    fortis.void("tx_1").await.unwrap();
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn credential_setters_are_probed_once() {
    let transport = RecordingTransport::new();
    let (mut builder, log) = FakeBuilder::new(Behaviour::RejectCredentials);
    builder.shapes.insert(CredentialField::DeveloperId, None);
    builder
        .shapes
        .insert(CredentialField::UserApiKey, Some(CredentialShape::Typed));
    builder.failing_setter = Some(CredentialField::UserId);

    let fortis = Fortis::new(credentials(), transport, Some(builder));

    assert!(fortis.has_structured_client());
    assert_eq!(
        log.lock().unwrap().credentials,
        vec![(CredentialField::UserApiKey, true)]
    );
}

#[cfg(feature = "structured-client")]
mod built_in_client {
    use connector_integration::connectors::fortis::structured::FortisSdkClientBuilder;

    use super::*;

    #[tokio::test]
    async fn sends_same_wire_request_as_fallback() {
        let transport = RecordingTransport::new();
        let builder = FortisSdkClientBuilder::new(SANDBOX, transport.clone());
        let fortis = Fortis::new(credentials(), transport.clone(), Some(Box::new(builder)));

        fortis
            .sale_tokenized(&token("tok_abc"), MinorUnit::new(1234), Some("ORDER-1"), None)
            .await
            .unwrap();

        assert_eq!(transport.calls(), 1);
        let request = transport.last();
        assert_eq!(request.url, format!("{SANDBOX}/v1/transactions/cc/sale/token"));
        assert_eq!(
            request.body,
            Some(json!({
                "token_id": "tok_abc",
                "transaction_amount": 1234,
                "order_number": "ORDER-1",
                "location_id": "loc_default"
            }))
        );
        assert_eq!(
            request.headers.get("user-api-key").map(String::as_str),
            Some("key_789")
        );
    }

    #[tokio::test]
    async fn blank_api_key_makes_exactly_one_http_call() {
        let transport = RecordingTransport::new();
        let credentials = credentials();
        let credentials = domain_types::types::FortisCredentials {
            user_api_key: token(""),
            ..credentials
        };
        let builder = FortisSdkClientBuilder::new(SANDBOX, transport.clone());
        let fortis = Fortis::new(credentials, transport.clone(), Some(Box::new(builder)));

        let result = fortis.get("tx_1").await.unwrap();

        assert_eq!(result.transaction_id(), Some("tx_1"));
        assert_eq!(transport.calls(), 1);
        assert_eq!(transport.last().method, Method::Get);
    }

    #[tokio::test]
    async fn error_status_is_reported_with_processor_errors() {
        let transport = RecordingTransport::new();
        transport.queue(Reply::Json(
            401,
            json!({"errors": {"auth": ["invalid user-api-key"]}}),
        ));
        let builder = FortisSdkClientBuilder::new(SANDBOX, transport.clone());
        let fortis = Fortis::new(credentials(), transport.clone(), Some(Box::new(builder)));

        let result = fortis.void("tx_1").await.unwrap();

        assert_eq!(
            result.to_value(),
            json!({"errors": {"auth": ["invalid user-api-key"]}, "code": 401})
        );
        assert_eq!(transport.calls(), 1);
    }
}

#[test]
fn stored_status_of_empty_payment_is_new() {
    assert_eq!(resolve_stored_status(None), LifecycleStatus::New);
    assert_eq!(resolve_stored_status(Some(&json!({}))), LifecycleStatus::New);
    assert_eq!(
        resolve_stored_status(Some(&json!({"data": {"id": "tx", "type": "authonly", "status_code": 1001}}))),
        LifecycleStatus::Authorized
    );
}
