use common_utils::ext_traits::ByteSliceExt;
use interfaces::webhooks::PaymentResync;
use serde::Serialize;
use serde_json::Value;

/// Body returned to the processor for every notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationAck {
    pub ok: bool,
}

/// Acknowledges an inbound processor notification.
///
/// When a transaction id can be read from the body it is handed to `resync`.
/// Unreadable bodies and resync failures are logged; the processor is always
/// answered with `{"ok": true}` so it does not redeliver.
#[tracing::instrument(skip_all)]
pub async fn handle_notification(body: &[u8], resync: &dyn PaymentResync) -> NotificationAck {
    let payload = match body.parse_struct::<Value>("FortisNotification") {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(?error, "ignoring unreadable notification body");
            return NotificationAck { ok: true };
        }
    };

    match notification_transaction_id(&payload) {
        Some(transaction_id) => {
            if let Err(error) = resync.resync(&transaction_id).await {
                tracing::warn!(%transaction_id, ?error, "payment resync failed");
            }
        }
        None => tracing::info!("notification carries no transaction id"),
    }

    NotificationAck { ok: true }
}

/// `data.id`, then `transaction_id`, then `id`
pub fn notification_transaction_id(payload: &Value) -> Option<String> {
    ["/data/id", "/transaction_id", "/id"]
        .into_iter()
        .filter_map(|pointer| payload.pointer(pointer))
        .find_map(|id| match id {
            Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
}
