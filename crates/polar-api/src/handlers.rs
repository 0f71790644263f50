//! # Request Handlers
//!
//! Axum request handlers: home page, checkout, customer portal and webhooks.

use crate::error::ApiError;
use crate::pages;
use crate::state::{AppFlavor, AppState};
use axum::{
    body::Bytes,
    extract::{Query, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use polar_client::{
    dispatch_webhook_event, WebhookHeaders, HEADER_WEBHOOK_ID, HEADER_WEBHOOK_SIGNATURE,
    HEADER_WEBHOOK_TIMESTAMP,
};
use polar_core::{BillingError, CheckoutRequest, WebhookEvent};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Portal query
#[derive(Debug, Deserialize)]
pub struct PortalQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// 302 Found with a Location header
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Collect every product id from a raw query string.
///
/// Accepts repeated `products` keys and the single `product` key.
pub fn product_ids_from_query(query: Option<&str>) -> Result<Vec<Uuid>, BillingError> {
    let query = query.unwrap_or_default();

    let ids = url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| matches!(&**key, "products" | "product"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(|value| {
            Uuid::parse_str(&value).map_err(|_| {
                BillingError::InvalidRequest(format!("Invalid product id: {}", value))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(BillingError::InvalidRequest(
            "Missing products parameter".to_string(),
        ));
    }

    Ok(ids)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "polar-cart",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.mode.as_str(),
        "flavor": state.config.flavor.as_str(),
        "uptime_secs": state.uptime_secs(),
    }))
}

/// Home page: product links and the portal form
#[instrument(skip(state), fields(flavor = state.config.flavor.as_str()))]
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let flavor = state.config.flavor;

    let products = match state.provider.list_products(false).await {
        Ok(products) => products,
        Err(e) if flavor == AppFlavor::Showcase => {
            error!("Failed to fetch products: {}", e);
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    info!("Home page: {} products", products.len());
    Ok(Html(pages::home_page(flavor, &products)))
}

/// Create a checkout session and redirect to it
#[instrument(skip(state, query))]
pub async fn checkout(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let product_ids = product_ids_from_query(query.as_deref())?;

    let request = CheckoutRequest::new(product_ids).with_success_url(state.success_url.clone());

    let session = state.provider.create_checkout(&request).await?;

    info!("Redirecting to checkout {}", session.id);
    Ok(found(session.url))
}

/// Open the customer portal for the customer owning `email`
#[instrument(skip(state, query))]
pub async fn portal(
    State(state): State<AppState>,
    Query(query): Query<PortalQuery>,
) -> Result<Response, ApiError> {
    let email = query
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| BillingError::InvalidRequest("Missing email parameter".to_string()))?;

    let session = state.provider.portal_session_for_email(&email).await?;

    info!("Redirecting customer {} to portal", session.customer_id);
    Ok(found(session.customer_portal_url))
}

/// Verify and accept a Polar webhook, echoing the body on success
#[instrument(skip(state, headers, body), fields(bytes = body.len()))]
pub async fn polar_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    };
    let webhook_headers = WebhookHeaders {
        id: get(HEADER_WEBHOOK_ID),
        timestamp: get(HEADER_WEBHOOK_TIMESTAMP),
        signature: get(HEADER_WEBHOOK_SIGNATURE),
    };

    let payload = match state.verifier.verify(&body, &webhook_headers) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Webhook rejected: {}", e);
            return (StatusCode::FORBIDDEN, e.to_string()).into_response();
        }
    };

    let event = WebhookEvent::from_payload(webhook_headers.id.unwrap_or_default(), &payload);
    info!(
        "Received webhook: type={}, id={}",
        event.event_type, event.message_id
    );

    if let Err(e) = dispatch_webhook_event(state.webhook_handler.as_ref(), &event) {
        error!("Webhook handler error: {}", e);
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_ids_repeated_and_single() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let query = format!("products={}&products={}&utm=x", a, b);
        assert_eq!(product_ids_from_query(Some(&query)).unwrap(), vec![a, b]);

        let query = format!("product={}", a);
        assert_eq!(product_ids_from_query(Some(&query)).unwrap(), vec![a]);
    }

    #[test]
    fn test_product_ids_missing() {
        let err = product_ids_from_query(None).unwrap_err();
        assert_eq!(err.status_code(), 400);

        let err = product_ids_from_query(Some("products=")).unwrap_err();
        assert!(err.to_string().contains("Missing products parameter"));
    }

    #[test]
    fn test_product_ids_malformed() {
        let err = product_ids_from_query(Some("products=abc")).unwrap_err();
        assert!(matches!(err, BillingError::InvalidRequest(_)));
    }
}
