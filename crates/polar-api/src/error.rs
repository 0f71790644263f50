//! HTTP mapping for billing errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use polar_core::BillingError;
use tracing::{error, warn};

/// Handler error: a `BillingError` rendered as a plain-text response
#[derive(Debug)]
pub struct ApiError(pub BillingError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Text safe to show the client. Server-side failures stay generic.
    pub fn public_message(&self) -> String {
        match &self.0 {
            BillingError::InvalidRequest(msg) => msg.clone(),
            BillingError::ProviderError { .. } | BillingError::NetworkError(_) => {
                "Billing service unavailable".to_string()
            }
            err if err.is_client_error() => err.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(%status, error = %self.0, "Request failed");
        } else {
            warn!(%status, error = %self.0, "Request rejected");
        }

        (status, self.public_message()).into_response()
    }
}
