//! # Billing Error Types
//!
//! Typed error handling for polar-cart.
//! All billing operations return `Result<T, BillingError>`.

use thiserror::Error;

/// Core error type for all billing operations
#[derive(Debug, Error)]
pub enum BillingError {
    /// Configuration errors (missing token, malformed URL)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing or malformed request parameter
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No customer matched the lookup
    #[error("Customer not found")]
    CustomerNotFound { email: String },

    /// Billing provider API returned a non-success status
    #[error("Provider error [{provider}] (HTTP {status}): {message}")]
    ProviderError {
        provider: String,
        status: u16,
        message: String,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("{0}")]
    WebhookVerificationFailed(String),

    /// Verified webhook payload could not be parsed
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            BillingError::Configuration(_) => 500,
            BillingError::InvalidRequest(_) => 400,
            BillingError::CustomerNotFound { .. } => 404,
            BillingError::ProviderError { .. } => 502,
            BillingError::NetworkError(_) => 503,
            BillingError::WebhookVerificationFailed(_) => 403,
            BillingError::WebhookParseError(_) => 403,
            BillingError::Serialization(_) => 500,
            BillingError::Internal(_) => 500,
        }
    }

    /// Returns true for request errors the caller can fix
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Result type alias for billing operations
pub type BillingResult<T> = Result<T, BillingError>;
