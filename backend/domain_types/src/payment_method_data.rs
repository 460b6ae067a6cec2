use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};

/// How the card is presented for a transaction. Exactly one variant is active.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethodSelector {
    /// Previously vaulted card referenced by an opaque token
    Token { token_id: Secret<String> },
    /// Raw card details
    Keyed(KeyedCard),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyedCard {
    pub account_number: Secret<String>,
    /// MMYY
    pub exp_date: Secret<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv: Option<Secret<String>>,
}

impl PaymentMethodSelector {
    pub fn token(token_id: impl Into<String>) -> Self {
        Self::Token {
            token_id: Secret::new(token_id.into()),
        }
    }

    pub fn keyed(
        account_number: impl Into<String>,
        exp_date: impl Into<String>,
        cvv: Option<String>,
    ) -> Self {
        Self::Keyed(KeyedCard {
            account_number: Secret::new(account_number.into()),
            exp_date: Secret::new(exp_date.into()),
            cvv: cvv.map(Secret::new),
        })
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token { .. })
    }
}
