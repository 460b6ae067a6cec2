use common_utils::CustomResult;
use connector_integration::connectors::fortis::transformers::missing_transaction_id;
use domain_types::{
    connector_types::NormalizedResult,
    payment_record::{PaymentDetails, FORTIS_REFUND_RESPONSE},
};
use interfaces::api::FortisApi;

use crate::error::{GatewayError, ReportSwitchExt};

pub const REFUND_AMOUNT_REQUIRED: &str = "Refund amount is required";

/// Refunds the payment's transaction.
///
/// Preconditions are checked before any call: a transaction id must be
/// resolvable from the record and the refund amount must be positive.
pub async fn refund(api: &dyn FortisApi, details: &mut PaymentDetails) -> CustomResult<(), GatewayError> {
    let amount = details.refund_amount();
    let result = match details.transaction_id() {
        None => {
            tracing::info!("refund skipped, no transaction id on payment");
            missing_transaction_id()
        }
        Some(_) if !amount.is_positive() => {
            tracing::info!(%amount, "refund skipped, amount is not positive");
            NormalizedResult::error("amount", REFUND_AMOUNT_REQUIRED, 0)
        }
        Some(transaction_id) => api.refund(&transaction_id, amount).await.switch()?,
    };

    details.store_result(FORTIS_REFUND_RESPONSE, &result);
    Ok(())
}
