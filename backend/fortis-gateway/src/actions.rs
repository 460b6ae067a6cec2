//! Lifecycle action dispatch.
//!
//! Each host lifecycle step reads what it needs from the payment, calls the
//! matching transaction operation and writes the normalized result back on
//! the payment details under the step's own key.

pub mod authorize;
pub mod cancel;
pub mod capture;
pub mod convert;
pub mod refund;
pub mod status;

use std::sync::Arc;

use common_utils::CustomResult;
use domain_types::{connector_types::LifecycleStatus, payment_record::PaymentSource};
use interfaces::api::FortisApi;

use crate::error::GatewayError;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleAction {
    Authorize,
    Capture,
    Cancel,
    Refund,
    Status,
}

#[derive(Clone)]
pub struct ActionDispatcher {
    api: Arc<dyn FortisApi>,
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher").finish_non_exhaustive()
    }
}

impl ActionDispatcher {
    pub fn new(api: Arc<dyn FortisApi>) -> Self {
        Self { api }
    }

    /// Runs `action` against `payment` and returns the payment's status afterwards.
    #[tracing::instrument(skip_all, fields(action = %action, payment_id = %payment.id))]
    pub async fn execute(
        &self,
        action: LifecycleAction,
        payment: &mut PaymentSource,
    ) -> CustomResult<LifecycleStatus, GatewayError> {
        let api = self.api.as_ref();
        match action {
            LifecycleAction::Authorize => authorize::authorize(api, payment).await?,
            LifecycleAction::Capture => capture::capture(api, payment).await?,
            LifecycleAction::Cancel => cancel::cancel(api, &mut payment.details).await?,
            LifecycleAction::Refund => refund::refund(api, &mut payment.details).await?,
            LifecycleAction::Status => (),
        }

        let status = status::status(&payment.details);
        tracing::info!(%status, "lifecycle action completed");
        Ok(status)
    }
}
