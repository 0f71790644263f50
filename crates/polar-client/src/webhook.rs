//! # Polar Webhook Handling
//!
//! Polar signs webhooks with the Standard Webhooks scheme:
//!
//! - headers `webhook-id`, `webhook-timestamp`, `webhook-signature`
//! - signed content `"{id}.{timestamp}.{body}"`
//! - HMAC-SHA256, base64 encoded, sent as space separated `v1,<sig>` entries
//!
//! The verification key is the raw UTF-8 bytes of the dashboard secret.

use base64::prelude::*;
use chrono::Utc;
use hmac::{Hmac, Mac};
use polar_core::{BillingError, BillingResult, WebhookEvent, WebhookEventType};
use sha2::Sha256;
use tracing::{debug, info, warn};

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_WEBHOOK_ID: &str = "webhook-id";
pub const HEADER_WEBHOOK_TIMESTAMP: &str = "webhook-timestamp";
pub const HEADER_WEBHOOK_SIGNATURE: &str = "webhook-signature";

/// Allowed clock skew in either direction, in seconds
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

const SECRET_PREFIX: &str = "whsec_";

/// The three signature headers of a webhook delivery
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookHeaders<'a> {
    pub id: Option<&'a str>,
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
}

impl<'a> WebhookHeaders<'a> {
    pub fn new(id: &'a str, timestamp: &'a str, signature: &'a str) -> Self {
        Self {
            id: Some(id),
            timestamp: Some(timestamp),
            signature: Some(signature),
        }
    }
}

/// Standard Webhooks signature verifier
#[derive(Clone)]
pub struct WebhookVerifier {
    key: Vec<u8>,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    /// Use the raw bytes of `secret` as the HMAC key (Polar's convention).
    pub fn from_raw_secret(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    /// Decode a base64 secret, with or without the `whsec_` prefix.
    pub fn from_base64_secret(secret: &str) -> BillingResult<Self> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = BASE64_STANDARD.decode(encoded).map_err(|e| {
            BillingError::Configuration(format!("Webhook secret is not valid base64: {}", e))
        })?;
        Ok(Self { key })
    }

    /// Verify a delivery against the current time and return its JSON payload.
    pub fn verify(
        &self,
        payload: &[u8],
        headers: &WebhookHeaders<'_>,
    ) -> BillingResult<serde_json::Value> {
        self.verify_at(payload, headers, Utc::now().timestamp())
    }

    /// Verify a delivery against an explicit unix time.
    pub fn verify_at(
        &self,
        payload: &[u8],
        headers: &WebhookHeaders<'_>,
        now: i64,
    ) -> BillingResult<serde_json::Value> {
        let (id, timestamp, signature) = match (headers.id, headers.timestamp, headers.signature)
        {
            (Some(id), Some(ts), Some(sig))
                if !id.is_empty() && !ts.is_empty() && !sig.is_empty() =>
            {
                (id, ts, sig)
            }
            _ => return Err(verification_failed("Missing required headers")),
        };

        let timestamp = verify_timestamp(timestamp, now)?;
        let expected = self.compute_signature(id, timestamp, payload);

        let matched = signature
            .split(' ')
            .filter_map(|entry| {
                let mut parts = entry.split(',');
                Some((parts.next()?, parts.next()?))
            })
            .any(|(version, sig)| version == "v1" && constant_time_compare(sig, &expected));

        if !matched {
            return Err(verification_failed("No matching signature found"));
        }

        serde_json::from_slice(payload)
            .map_err(|e| BillingError::WebhookParseError(format!("Invalid JSON payload: {}", e)))
    }

    /// Produce a `v1,<sig>` header value for a delivery.
    pub fn sign(&self, id: &str, timestamp: i64, payload: &[u8]) -> String {
        format!("v1,{}", self.compute_signature(id, timestamp, payload))
    }

    fn compute_signature(&self, id: &str, timestamp: i64, payload: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        BASE64_STANDARD.encode(mac.finalize().into_bytes())
    }
}

fn verification_failed(reason: &str) -> BillingError {
    BillingError::WebhookVerificationFailed(reason.to_string())
}

fn verify_timestamp(raw: &str, now: i64) -> BillingResult<i64> {
    let timestamp: i64 = raw
        .trim()
        .parse()
        .map_err(|_| verification_failed("Invalid Signature Headers"))?;

    if now.saturating_sub(timestamp) > TIMESTAMP_TOLERANCE_SECS {
        return Err(verification_failed("Message timestamp too old"));
    }
    if timestamp > now.saturating_add(TIMESTAMP_TOLERANCE_SECS) {
        return Err(verification_failed("Message timestamp too new"));
    }

    Ok(timestamp)
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Webhook event handler trait
///
/// Implement this trait to react to specific events. Every method logs by default.
#[allow(unused_variables)]
pub trait WebhookHandler: Send + Sync {
    fn on_checkout(&self, event: &WebhookEvent) -> BillingResult<()> {
        info!(
            "Checkout {}: id={:?}",
            event.event_type,
            event.object_id()
        );
        Ok(())
    }

    fn on_order(&self, event: &WebhookEvent) -> BillingResult<()> {
        info!(
            "Order {}: id={:?}, customer={:?}",
            event.event_type,
            event.object_id(),
            event.customer_email()
        );
        Ok(())
    }

    fn on_subscription(&self, event: &WebhookEvent) -> BillingResult<()> {
        info!(
            "Subscription {}: id={:?}",
            event.event_type,
            event.object_id()
        );
        Ok(())
    }

    fn on_customer(&self, event: &WebhookEvent) -> BillingResult<()> {
        info!("Customer {}: id={:?}", event.event_type, event.object_id());
        Ok(())
    }

    fn on_other(&self, event: &WebhookEvent) -> BillingResult<()> {
        debug!("Unhandled webhook event: {}", event.event_type);
        Ok(())
    }
}

/// Default handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a verified event to the matching handler method
pub fn dispatch_webhook_event(
    handler: &dyn WebhookHandler,
    event: &WebhookEvent,
) -> BillingResult<()> {
    use WebhookEventType::*;

    match &event.event_type {
        CheckoutCreated | CheckoutUpdated => handler.on_checkout(event),
        OrderCreated | OrderPaid | OrderRefunded | RefundCreated => handler.on_order(event),
        SubscriptionCreated
        | SubscriptionUpdated
        | SubscriptionActive
        | SubscriptionCanceled
        | SubscriptionUncanceled
        | SubscriptionRevoked => handler.on_subscription(event),
        CustomerCreated | CustomerUpdated | CustomerDeleted | CustomerStateChanged => {
            handler.on_customer(event)
        }
        Unknown(name) => {
            warn!("Unknown webhook event type: {:?}", name);
            handler.on_other(event)
        }
        _ => handler.on_other(event),
    }
}
