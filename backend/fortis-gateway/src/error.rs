use domain_types::errors::{ApiClientError, ConnectorError};

/// Allows [error_stack::Report] to change between error contexts
/// using the dependent [ErrorSwitch] trait to define relations & mappings between traits
pub trait ReportSwitchExt<T, U> {
    /// Switch to the intended report by calling switch
    /// requires error switch to be already implemented on the error type
    fn switch(self) -> Result<T, error_stack::Report<U>>;
}

impl<T, U, V> ReportSwitchExt<T, U> for Result<T, error_stack::Report<V>>
where
    V: ErrorSwitch<U> + error_stack::Context,
    U: error_stack::Context,
{
    #[track_caller]
    fn switch(self) -> Result<T, error_stack::Report<U>> {
        match self {
            Ok(i) => Ok(i),
            Err(er) => {
                let new_c = er.current_context().switch();
                Err(er.change_context(new_c))
            }
        }
    }
}

/// Allow [error_stack::Report] to convert between error types
/// This auto-implements [ReportSwitchExt] for the corresponding errors
pub trait ErrorSwitch<T> {
    /// Get the next error type that the source error can be escalated into
    /// This does not consume the source error since we need to keep it in context
    fn switch(&self) -> T;
}

/// Failures a lifecycle action hands back to the host framework.
///
/// Processor outcomes never show up here, they are stored on the payment record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    #[error("Payment is missing {0}")]
    InvalidPayment(String),
    #[error("Fortis credentials were rejected: {0}")]
    CredentialSetupFailed(String),
    #[error("Failed to build the Fortis client")]
    ClientConstructionFailed,
    #[error("Card tokenization failed")]
    TokenizationFailed,
    #[error("Fortis request could not be prepared")]
    RequestPreparationFailed,
    #[error("Payment document could not be read")]
    InvalidDocument,
}

impl ErrorSwitch<GatewayError> for ConnectorError {
    fn switch(&self) -> GatewayError {
        match self {
            Self::MissingRequiredField { field_name } => {
                GatewayError::InvalidPayment(field_name.to_string())
            }
            Self::InvalidArgument {
                field_name,
                message,
            } => GatewayError::InvalidPayment(format!("a valid {field_name} ({message})")),
            Self::CredentialSetupFailed(message) => {
                GatewayError::CredentialSetupFailed(message.clone())
            }
            Self::CardTokenizationFailed(_) => GatewayError::TokenizationFailed,
            Self::RequestEncodingFailed | Self::ResponseDeserializationFailed => {
                GatewayError::RequestPreparationFailed
            }
        }
    }
}

impl ErrorSwitch<GatewayError> for ApiClientError {
    fn switch(&self) -> GatewayError {
        GatewayError::ClientConstructionFailed
    }
}
