use common_utils::CustomResult;
use connector_integration::connectors::fortis::transformers::resolve_stored_status;
use domain_types::{
    connector_types::LifecycleStatus,
    payment_record::{
        PaymentSource, AMOUNT_MINOR, FORTIS_AUTH_RESPONSE, FORTIS_CAPTURE_RESPONSE,
        FORTIS_RESPONSE,
    },
};
use interfaces::api::FortisApi;
use serde_json::json;

use super::convert;
use crate::error::{GatewayError, ReportSwitchExt};

/// Collects the payment amount.
///
/// A standing authorization is completed; a payment without one is charged
/// with a sale. Captured payments are left alone and a payment in an unknown
/// state is only refreshed, so repeating the action never charges twice.
pub async fn capture(
    api: &dyn FortisApi,
    payment: &mut PaymentSource,
) -> CustomResult<(), GatewayError> {
    let transaction_id = payment.details.transaction_id();
    match (
        resolve_stored_status(payment.details.response(FORTIS_RESPONSE)),
        transaction_id,
    ) {
        (LifecycleStatus::Captured, _) => {
            tracing::info!(payment_id = %payment.id, "payment already captured");
            Ok(())
        }
        (LifecycleStatus::Authorized, Some(transaction_id)) => {
            complete_authorization(api, payment, &transaction_id).await
        }
        (LifecycleStatus::Unknown, Some(transaction_id)) => {
            let refreshed = api.get(&transaction_id).await.switch()?;
            payment.details.store_result(FORTIS_RESPONSE, &refreshed);
            Ok(())
        }
        (LifecycleStatus::New | LifecycleStatus::Failed, _)
        | (LifecycleStatus::Authorized | LifecycleStatus::Unknown, None) => {
            sale(api, payment).await
        }
    }
}

async fn complete_authorization(
    api: &dyn FortisApi,
    payment: &mut PaymentSource,
    transaction_id: &str,
) -> CustomResult<(), GatewayError> {
    let result = api.capture(transaction_id, payment.amount).await.switch()?;
    if !result.is_success() {
        payment.details.store_result(FORTIS_CAPTURE_RESPONSE, &result);
        return Ok(());
    }

    if let Some(authorization) = payment.details.remove(FORTIS_RESPONSE) {
        payment.details.insert(FORTIS_AUTH_RESPONSE, authorization);
    }
    payment.details.remove(FORTIS_CAPTURE_RESPONSE);
    payment.details.store_result(FORTIS_RESPONSE, &result);
    Ok(())
}

async fn sale(api: &dyn FortisApi, payment: &mut PaymentSource) -> CustomResult<(), GatewayError> {
    let result = match convert::convert_payment(payment) {
        Some(request) => api.sale(&request).await.switch()?,
        None => convert::unsupported_payment_method(),
    };

    payment
        .details
        .insert(AMOUNT_MINOR, json!(payment.amount.get_amount_as_i64()));
    payment.details.store_result(FORTIS_RESPONSE, &result);
    Ok(())
}
