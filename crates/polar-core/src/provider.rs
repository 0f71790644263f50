//! # Billing Provider Trait
//!
//! The seam between HTTP handlers and the hosted billing service.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   BillingProvider (trait)                   │
//! │  ├── list_products()                                        │
//! │  ├── create_checkout()                                      │
//! │  ├── find_customers_by_email()                              │
//! │  └── create_customer_session()                              │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!              ┌─────────────┴─────────────┐
//!      ┌───────┴───────┐           ┌───────┴───────┐
//!      │  PolarClient  │           │ test doubles  │
//!      └───────────────┘           └───────────────┘
//! ```

use crate::error::{BillingError, BillingResult};
use crate::product::Product;
use crate::session::{CheckoutRequest, CheckoutSession, Customer, CustomerSession};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Operations the web layer needs from a billing service.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// List catalog products. Archived products are excluded unless asked for.
    async fn list_products(&self, include_archived: bool) -> BillingResult<Vec<Product>>;

    /// Create a hosted checkout session.
    async fn create_checkout(&self, request: &CheckoutRequest) -> BillingResult<CheckoutSession>;

    /// Look up customers by exact email address.
    async fn find_customers_by_email(&self, email: &str) -> BillingResult<Vec<Customer>>;

    /// Create a customer portal session for a customer.
    async fn create_customer_session(&self, customer_id: Uuid) -> BillingResult<CustomerSession>;

    /// Provider name (for logging).
    fn provider_name(&self) -> &'static str;

    /// Resolve a portal session for the first customer matching `email`.
    async fn portal_session_for_email(&self, email: &str) -> BillingResult<CustomerSession> {
        let customers = self.find_customers_by_email(email).await?;
        let customer = customers
            .first()
            .ok_or_else(|| BillingError::CustomerNotFound {
                email: email.to_string(),
            })?;
        self.create_customer_session(customer.id).await
    }
}

/// Shared, dynamically dispatched provider
pub type SharedBillingProvider = Arc<dyn BillingProvider>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubProvider {
        customers: Vec<Customer>,
        sessions_for: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl BillingProvider for StubProvider {
        async fn list_products(&self, _include_archived: bool) -> BillingResult<Vec<Product>> {
            Ok(Vec::new())
        }

        async fn create_checkout(
            &self,
            _request: &CheckoutRequest,
        ) -> BillingResult<CheckoutSession> {
            Err(BillingError::Internal("unused".into()))
        }

        async fn find_customers_by_email(&self, email: &str) -> BillingResult<Vec<Customer>> {
            Ok(self
                .customers
                .iter()
                .filter(|c| c.email == email)
                .cloned()
                .collect())
        }

        async fn create_customer_session(
            &self,
            customer_id: Uuid,
        ) -> BillingResult<CustomerSession> {
            self.sessions_for.lock().unwrap().push(customer_id);
            Ok(CustomerSession::new(
                Uuid::new_v4(),
                customer_id,
                format!("https://polar.sh/portal/{}", customer_id),
            ))
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }
    }

    #[tokio::test]
    async fn test_portal_session_uses_first_match() {
        let first = Uuid::new_v4();
        let provider = StubProvider {
            customers: vec![
                Customer::new(first, "a@example.com"),
                Customer::new(Uuid::new_v4(), "a@example.com"),
            ],
            sessions_for: Mutex::new(Vec::new()),
        };

        let session = provider.portal_session_for_email("a@example.com").await.unwrap();
        assert_eq!(session.customer_id, first);
        assert_eq!(*provider.sessions_for.lock().unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_portal_session_not_found() {
        let provider = StubProvider {
            customers: Vec::new(),
            sessions_for: Mutex::new(Vec::new()),
        };

        let err = provider
            .portal_session_for_email("nobody@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::CustomerNotFound { .. }));
        assert!(provider.sessions_for.lock().unwrap().is_empty());
    }
}
