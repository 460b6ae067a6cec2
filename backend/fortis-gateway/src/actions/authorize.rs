use common_utils::CustomResult;
use domain_types::payment_record::{PaymentSource, AMOUNT_MINOR, FORTIS_RESPONSE};
use interfaces::api::FortisApi;
use serde_json::json;

use super::convert;
use crate::error::{GatewayError, ReportSwitchExt};

/// Places a hold for the payment amount and stores the outcome as the primary response.
pub async fn authorize(
    api: &dyn FortisApi,
    payment: &mut PaymentSource,
) -> CustomResult<(), GatewayError> {
    let result = match convert::convert_payment(payment) {
        Some(request) => api.authorize(&request).await.switch()?,
        None => convert::unsupported_payment_method(),
    };

    payment
        .details
        .insert(AMOUNT_MINOR, json!(payment.amount.get_amount_as_i64()));
    payment.details.store_result(FORTIS_RESPONSE, &result);
    Ok(())
}
