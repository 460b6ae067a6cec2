use common_utils::ext_traits::StringExt;
use domain_types::{
    connector_types::{NormalizedResult, TransactionRequest},
    payment_method_data::PaymentMethodSelector,
    payment_record::{PaymentDetails, PaymentSource},
};

pub const PAYMENT_TOKEN: &str = "payment_token";
pub const CC_NUMBER: &str = "cc_number";
pub const EXP_DATE: &str = "exp_date";
pub const CVV: &str = "cvv";
pub const ORDER_NUMBER: &str = "order_number";
pub const LOCATION_ID: &str = "location_id";

const PAYMENT_METHOD_ERROR_KEY: &str = "payment_method";

/// Adapter fields for a host payment.
///
/// `None` when the payment carries neither a token nor complete card details.
pub fn convert_payment(payment: &PaymentSource) -> Option<TransactionRequest> {
    let details = &payment.details;
    let payment_method = select_payment_method(details)?;
    let order_number = details
        .get_str(ORDER_NUMBER)
        .or_else(|| payment.order_number.as_deref().and_then(StringExt::non_empty))
        .or_else(|| payment.id.as_str().non_empty());

    Some(TransactionRequest {
        amount: payment.amount,
        order_number,
        location_id: details.get_str(LOCATION_ID),
        payment_method,
    })
}

/// A token wins over card details when both are present. Card details need
/// both the number and the expiry; the CVV is optional.
pub fn select_payment_method(details: &PaymentDetails) -> Option<PaymentMethodSelector> {
    if let Some(token) = details.get_str(PAYMENT_TOKEN) {
        return Some(PaymentMethodSelector::token(token));
    }
    let account_number = details.get_str(CC_NUMBER)?;
    let exp_date = details.get_str(EXP_DATE)?;
    Some(PaymentMethodSelector::keyed(
        account_number,
        exp_date,
        details.get_str(CVV),
    ))
}

pub fn unsupported_payment_method() -> NormalizedResult {
    NormalizedResult::error(
        PAYMENT_METHOD_ERROR_KEY,
        "Payment has no token and no complete card details",
        0,
    )
}
