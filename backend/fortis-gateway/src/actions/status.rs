use connector_integration::connectors::fortis::transformers::resolve_stored_status;
use domain_types::{
    connector_types::LifecycleStatus,
    payment_record::{PaymentDetails, FORTIS_RESPONSE},
};

/// Status of a payment, read from its primary response
pub fn status(details: &PaymentDetails) -> LifecycleStatus {
    resolve_stored_status(details.response(FORTIS_RESPONSE))
}
