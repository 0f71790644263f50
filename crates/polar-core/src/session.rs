//! # Session Types
//!
//! Checkout sessions, customers, portal sessions and webhook events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parameters for a new checkout session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Products offered in the checkout (at least one)
    pub products: Vec<Uuid>,

    /// Where to send the customer after payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,

}

impl CheckoutRequest {
    pub fn new(products: Vec<Uuid>) -> Self {
        Self {
            products,
            success_url: None,
        }
    }

    /// Builder: set success URL when configured
    pub fn with_success_url(mut self, url: Option<impl Into<String>>) -> Self {
        self.success_url = url.map(Into::into);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Status of a checkout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    #[default]
    Open,
    Expired,
    Confirmed,
    Succeeded,
    Failed,
    /// Status added by Polar after this build
    #[serde(other)]
    Unknown,
}

/// A hosted checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: Uuid,

    /// URL to redirect the customer to
    pub url: String,

    #[serde(default)]
    pub status: CheckoutStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CheckoutSession {
    pub fn new(id: Uuid, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            status: CheckoutStatus::Open,
            expires_at: None,
        }
    }

    /// Check if session is still usable
    pub fn is_active(&self) -> bool {
        matches!(self.status, CheckoutStatus::Open)
            && self.expires_at.map(|exp| exp > Utc::now()).unwrap_or(true)
    }
}

/// A customer of the billing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Customer {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: None,
        }
    }
}

/// An authenticated session on the hosted customer portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSession {
    pub id: Uuid,

    pub customer_id: Uuid,

    pub customer_portal_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CustomerSession {
    pub fn new(id: Uuid, customer_id: Uuid, portal_url: impl Into<String>) -> Self {
        Self {
            id,
            customer_id,
            customer_portal_url: portal_url.into(),
            expires_at: None,
        }
    }
}

/// Webhook event types sent by the billing service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    CheckoutCreated,
    CheckoutUpdated,
    OrderCreated,
    OrderPaid,
    OrderRefunded,
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionActive,
    SubscriptionCanceled,
    SubscriptionUncanceled,
    SubscriptionRevoked,
    CustomerCreated,
    CustomerUpdated,
    CustomerDeleted,
    CustomerStateChanged,
    ProductCreated,
    ProductUpdated,
    BenefitGrantCreated,
    BenefitGrantUpdated,
    BenefitGrantRevoked,
    RefundCreated,
    /// Unknown event (passthrough)
    Unknown(String),
}

impl WebhookEventType {
    pub fn parse(name: &str) -> Self {
        match name {
            "checkout.created" => Self::CheckoutCreated,
            "checkout.updated" => Self::CheckoutUpdated,
            "order.created" => Self::OrderCreated,
            "order.paid" => Self::OrderPaid,
            "order.refunded" => Self::OrderRefunded,
            "subscription.created" => Self::SubscriptionCreated,
            "subscription.updated" => Self::SubscriptionUpdated,
            "subscription.active" => Self::SubscriptionActive,
            "subscription.canceled" => Self::SubscriptionCanceled,
            "subscription.uncanceled" => Self::SubscriptionUncanceled,
            "subscription.revoked" => Self::SubscriptionRevoked,
            "customer.created" => Self::CustomerCreated,
            "customer.updated" => Self::CustomerUpdated,
            "customer.deleted" => Self::CustomerDeleted,
            "customer.state_changed" => Self::CustomerStateChanged,
            "product.created" => Self::ProductCreated,
            "product.updated" => Self::ProductUpdated,
            "benefit_grant.created" => Self::BenefitGrantCreated,
            "benefit_grant.updated" => Self::BenefitGrantUpdated,
            "benefit_grant.revoked" => Self::BenefitGrantRevoked,
            "refund.created" => Self::RefundCreated,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::CheckoutCreated => "checkout.created",
            Self::CheckoutUpdated => "checkout.updated",
            Self::OrderCreated => "order.created",
            Self::OrderPaid => "order.paid",
            Self::OrderRefunded => "order.refunded",
            Self::SubscriptionCreated => "subscription.created",
            Self::SubscriptionUpdated => "subscription.updated",
            Self::SubscriptionActive => "subscription.active",
            Self::SubscriptionCanceled => "subscription.canceled",
            Self::SubscriptionUncanceled => "subscription.uncanceled",
            Self::SubscriptionRevoked => "subscription.revoked",
            Self::CustomerCreated => "customer.created",
            Self::CustomerUpdated => "customer.updated",
            Self::CustomerDeleted => "customer.deleted",
            Self::CustomerStateChanged => "customer.state_changed",
            Self::ProductCreated => "product.created",
            Self::ProductUpdated => "product.updated",
            Self::BenefitGrantCreated => "benefit_grant.created",
            Self::BenefitGrantUpdated => "benefit_grant.updated",
            Self::BenefitGrantRevoked => "benefit_grant.revoked",
            Self::RefundCreated => "refund.created",
            Self::Unknown(name) => name,
        }
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified webhook event
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Message id from the `webhook-id` header
    pub message_id: String,

    pub event_type: WebhookEventType,

    /// Event timestamp from the payload, if present
    pub timestamp: Option<DateTime<Utc>>,

    /// The `data` object of the payload
    pub data: serde_json::Value,
}

impl WebhookEvent {
    /// Build from a verified JSON payload
    pub fn from_payload(message_id: impl Into<String>, payload: &serde_json::Value) -> Self {
        let event_type = payload
            .get("type")
            .and_then(|v| v.as_str())
            .map(WebhookEventType::parse)
            .unwrap_or_else(|| WebhookEventType::Unknown(String::new()));

        let timestamp = payload
            .get("timestamp")
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            message_id: message_id.into(),
            event_type,
            timestamp,
            data: payload
                .get("data")
                .cloned()
                .unwrap_or(serde_json::Value::Null),
        }
    }

    /// `data.id` of the event, if present
    pub fn object_id(&self) -> Option<&str> {
        self.data.get("id").and_then(|v| v.as_str())
    }

    /// Customer email carried by the event object, if any
    pub fn customer_email(&self) -> Option<&str> {
        self.data
            .get("customer_email")
            .or_else(|| self.data.get("customer").and_then(|c| c.get("email")))
            .or_else(|| self.data.get("email"))
            .and_then(|v| v.as_str())
    }
}
