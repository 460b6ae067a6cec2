use common_utils::{CustomResult, MinorUnit};
use domain_types::{
    connector_types::{NormalizedResult, TransactionRequest},
    errors::ConnectorError,
    payment_method_data::{KeyedCard, PaymentMethodSelector},
};
use hyperswitch_masking::Secret;

/// Transaction operations of the Fortis adapter, one per lifecycle verb and card mode.
///
/// Every processor outcome, including declines and transport failures, comes back
/// as a [`NormalizedResult`]. The `Err` arm carries only invalid arguments and,
/// in strict mode, rejected credentials.
#[async_trait::async_trait]
pub trait FortisApi: Send + Sync {
    async fn sale_tokenized(
        &self,
        token_id: &Secret<String>,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError>;

    async fn sale_keyed(
        &self,
        card: &KeyedCard,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError>;

    async fn authorize_tokenized(
        &self,
        token_id: &Secret<String>,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError>;

    async fn authorize_keyed(
        &self,
        card: &KeyedCard,
        amount: MinorUnit,
        order_number: Option<&str>,
        location_id: Option<&str>,
    ) -> CustomResult<NormalizedResult, ConnectorError>;

    /// Completes a prior authorization
    async fn capture(
        &self,
        transaction_id: &str,
        amount: MinorUnit,
    ) -> CustomResult<NormalizedResult, ConnectorError>;

    async fn void(&self, transaction_id: &str) -> CustomResult<NormalizedResult, ConnectorError>;

    async fn refund(
        &self,
        transaction_id: &str,
        amount: MinorUnit,
    ) -> CustomResult<NormalizedResult, ConnectorError>;

    async fn get(&self, transaction_id: &str) -> CustomResult<NormalizedResult, ConnectorError>;

    /// Sale in whichever mode the request selects
    async fn sale(
        &self,
        request: &TransactionRequest,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        let order_number = request.order_number.as_deref();
        let location_id = request.location_id.as_deref();
        match &request.payment_method {
            PaymentMethodSelector::Token { token_id } => {
                self.sale_tokenized(token_id, request.amount, order_number, location_id)
                    .await
            }
            PaymentMethodSelector::Keyed(card) => {
                self.sale_keyed(card, request.amount, order_number, location_id)
                    .await
            }
        }
    }

    /// Authorization in whichever mode the request selects
    async fn authorize(
        &self,
        request: &TransactionRequest,
    ) -> CustomResult<NormalizedResult, ConnectorError> {
        let order_number = request.order_number.as_deref();
        let location_id = request.location_id.as_deref();
        match &request.payment_method {
            PaymentMethodSelector::Token { token_id } => {
                self.authorize_tokenized(token_id, request.amount, order_number, location_id)
                    .await
            }
            PaymentMethodSelector::Keyed(card) => {
                self.authorize_keyed(card, request.amount, order_number, location_id)
                    .await
            }
        }
    }
}
