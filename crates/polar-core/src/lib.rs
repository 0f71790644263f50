//! # polar-core
//!
//! Core types and traits for polar-cart.
//!
//! This crate provides:
//! - `BillingProvider` trait implemented by billing service clients
//! - `Product` and `ProductPrice` read models
//! - `CheckoutRequest`, `CheckoutSession`, `Customer` and `CustomerSession`
//! - `WebhookEvent` for verified inbound events
//! - `BillingError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use polar_core::{BillingProvider, CheckoutRequest};
//!
//! let request = CheckoutRequest::new(vec![product_id])
//!     .with_success_url(config.success_url.clone());
//!
//! let session = provider.create_checkout(&request).await?;
//!
//! // Redirect user to session.url
//! ```

pub mod error;
pub mod product;
pub mod provider;
pub mod session;

// Re-exports for convenience
pub use error::{BillingError, BillingResult};
pub use product::{AmountType, Product, ProductPrice, RecurringInterval};
pub use provider::{BillingProvider, SharedBillingProvider};
pub use session::{
    CheckoutRequest, CheckoutSession, CheckoutStatus, Customer, CustomerSession, WebhookEvent,
    WebhookEventType,
};
