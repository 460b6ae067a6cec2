#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApiClientError {
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Client construction failed")]
    ClientConstructionFailed,
    #[error("URL encoding of request failed")]
    UrlEncodingFailed,
    #[error("Failed to send request to connector {0}")]
    RequestNotSent(String),
    #[error("Failed to decode response")]
    ResponseDecodingFailed,
    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,
    #[error("Server responded with unexpected response")]
    UnexpectedServerResponse,
}

impl ApiClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimeoutReceived)
    }
}

/// Failures that are allowed to reach the caller of a transaction operation.
/// Everything the processor says, and every transport failure, is a value instead.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ConnectorError {
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Invalid value for {field_name}: {message}")]
    InvalidArgument {
        field_name: &'static str,
        message: String,
    },
    #[error("Structured client rejected the configured credentials: {0}")]
    CredentialSetupFailed(String),
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Card tokenization failed: {0}")]
    CardTokenizationFailed(String),
}

/// Failure classes raised by a structured (typed) processor client.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SdkError {
    /// Credentials were rejected locally, before any request left the process
    #[error("Authentication validation failed: {0}")]
    AuthValidation(String),
    /// The request model does not accept the supplied argument layout
    #[error("Request model rejected arguments: {0}")]
    InvalidArguments(String),
    /// The processor answered with an error status
    #[error("{message}")]
    Api {
        code: i64,
        message: String,
        raw_body: Option<String>,
    },
    #[error("Structured client construction failed: {0}")]
    Construction(String),
}

impl SdkError {
    /// Numeric code carried by the failure, 0 when there is none
    pub fn code(&self) -> i64 {
        match self {
            Self::Api { code, .. } => *code,
            Self::AuthValidation(_) | Self::InvalidArguments(_) | Self::Construction(_) => 0,
        }
    }

    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Api { raw_body, .. } => raw_body.as_deref(),
            Self::AuthValidation(_) | Self::InvalidArguments(_) | Self::Construction(_) => None,
        }
    }
}

/// Failures reported by the integrator while resyncing a payment from a notification.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ResyncError {
    #[error("No payment found for transaction {0}")]
    PaymentNotFound(String),
}
