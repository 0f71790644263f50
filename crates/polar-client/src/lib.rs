//! # polar-client
//!
//! Polar billing integration for polar-cart.
//!
//! This crate provides:
//!
//! 1. **PolarConfig** - environment validation (token, webhook secret, mode, success URL)
//! 2. **PolarClient** - REST client implementing `BillingProvider`
//!    - product listing
//!    - checkout sessions
//!    - customer lookup and customer portal sessions
//! 3. **WebhookVerifier** - Standard Webhooks signature verification
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polar_client::{PolarClient, PolarConfig};
//! use polar_core::{BillingProvider, CheckoutRequest};
//!
//! let client = PolarClient::new(PolarConfig::from_env()?)?;
//! let session = client.create_checkout(&CheckoutRequest::new(vec![product_id])).await?;
//!
//! // Redirect user to session.url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use polar_client::{dispatch_webhook_event, LoggingWebhookHandler, WebhookHeaders, WebhookVerifier};
//!
//! let verifier = WebhookVerifier::from_raw_secret(&config.webhook_secret);
//! let payload = verifier.verify(body, &WebhookHeaders::new(id, timestamp, signature))?;
//! let event = WebhookEvent::from_payload(id, &payload);
//! dispatch_webhook_event(&LoggingWebhookHandler, &event)?;
//! ```

pub mod client;
pub mod config;
pub mod webhook;

// Re-exports
pub use client::PolarClient;
pub use config::{PolarConfig, PolarMode};
pub use webhook::{
    dispatch_webhook_event, LoggingWebhookHandler, WebhookHandler, WebhookHeaders,
    WebhookVerifier, HEADER_WEBHOOK_ID, HEADER_WEBHOOK_SIGNATURE, HEADER_WEBHOOK_TIMESTAMP,
};
