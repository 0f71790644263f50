//! # Polar API Client
//!
//! Thin REST client over the Polar API, implementing `BillingProvider`.

use crate::config::PolarConfig;
use async_trait::async_trait;
use polar_core::{
    BillingError, BillingProvider, BillingResult, CheckoutRequest, CheckoutSession, Customer,
    CustomerSession, Product,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PROVIDER: &str = "polar";
const PAGE_LIMIT: &str = "100";

/// Polar REST client
#[derive(Clone)]
pub struct PolarClient {
    config: PolarConfig,
    client: Client,
}

impl PolarClient {
    /// Create a new client
    pub fn new(config: PolarConfig) -> BillingResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("polar-cart-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BillingError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.api_base_url, path);
        self.client
            .request(method, url)
            .header("Authorization", self.config.auth_header())
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> BillingResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| BillingError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BillingError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Polar API error: status={}, body={}", status, body);

            let message = serde_json::from_str::<PolarErrorResponse>(&body)
                .map(|e| e.message())
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));

            return Err(BillingError::ProviderError {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            BillingError::Serialization(format!("Failed to parse Polar response: {}", e))
        })
    }
}

#[async_trait]
impl BillingProvider for PolarClient {
    #[instrument(skip(self))]
    async fn list_products(&self, include_archived: bool) -> BillingResult<Vec<Product>> {
        let archived = if include_archived { "true" } else { "false" };
        let builder = self
            .request(Method::GET, "/v1/products/")
            .query(&[("is_archived", archived), ("limit", PAGE_LIMIT)]);

        let page: ListResource<Product> = self.send(builder).await?;
        debug!(
            "Listed {} products (total={})",
            page.items.len(),
            page.pagination.total_count
        );

        Ok(page.items)
    }

    #[instrument(skip(self, request), fields(products = request.products.len()))]
    async fn create_checkout(&self, request: &CheckoutRequest) -> BillingResult<CheckoutSession> {
        if request.is_empty() {
            return Err(BillingError::InvalidRequest(
                "Checkout requires at least one product".to_string(),
            ));
        }

        let builder = self.request(Method::POST, "/v1/checkouts/").json(request);
        let session: CheckoutSession = self.send(builder).await?;

        info!("Created Polar checkout: id={}, url={}", session.id, session.url);
        Ok(session)
    }

    #[instrument(skip(self, email))]
    async fn find_customers_by_email(&self, email: &str) -> BillingResult<Vec<Customer>> {
        let builder = self
            .request(Method::GET, "/v1/customers/")
            .query(&[("email", email)]);

        let page: ListResource<Customer> = self.send(builder).await?;
        debug!("Customer lookup matched {}", page.items.len());

        Ok(page.items)
    }

    #[instrument(skip(self))]
    async fn create_customer_session(&self, customer_id: Uuid) -> BillingResult<CustomerSession> {
        let builder = self
            .request(Method::POST, "/v1/customer-sessions/")
            .json(&CustomerSessionCreate { customer_id });

        let session: CustomerSession = self.send(builder).await?;
        info!("Created customer session for {}", session.customer_id);

        Ok(session)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Polar API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListResource<T> {
    items: Vec<T>,
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    #[serde(default)]
    total_count: u64,
}

#[derive(Debug, Serialize)]
struct CustomerSessionCreate {
    customer_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct PolarErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: serde_json::Value,
}

impl PolarErrorResponse {
    /// Flatten `detail` (string or validation error list) into one line
    fn message(&self) -> String {
        let detail = match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.get("msg")
                        .and_then(|m| m.as_str())
                        .map(String::from)
                        .unwrap_or_else(|| item.to_string())
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        };

        match &self.error {
            Some(kind) => format!("{}: {}", kind, detail),
            None => detail,
        }
    }
}
