use common_utils::CustomResult;
use domain_types::payment_record::{PaymentDetails, FORTIS_VOID_RESPONSE};
use interfaces::api::FortisApi;

use crate::error::{GatewayError, ReportSwitchExt};

/// Voids the payment's transaction. A record without a transaction id gets the
/// locally synthesized error from the client.
pub async fn cancel(api: &dyn FortisApi, details: &mut PaymentDetails) -> CustomResult<(), GatewayError> {
    let transaction_id = details.transaction_id().unwrap_or_default();
    let result = api.void(&transaction_id).await.switch()?;
    details.store_result(FORTIS_VOID_RESPONSE, &result);
    Ok(())
}
