use common_utils::CustomResult;
use domain_types::errors::ResyncError;

/// Supplied by the integrating system: finds the payment behind a processor
/// transaction and refreshes its stored status.
#[async_trait::async_trait]
pub trait PaymentResync: Send + Sync {
    async fn resync(&self, transaction_id: &str) -> CustomResult<(), ResyncError>;
}
