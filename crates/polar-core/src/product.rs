//! # Product Types
//!
//! Read-only views of products owned by the billing service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a price amount is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    Fixed,
    Custom,
    Free,
    SeatBased,
    MeteredUnit,
    #[serde(other)]
    Other,
}

/// Recurring interval of a subscription price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringInterval {
    Day,
    Week,
    Month,
    Year,
}

impl RecurringInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringInterval::Day => "day",
            RecurringInterval::Week => "week",
            RecurringInterval::Month => "month",
            RecurringInterval::Year => "year",
        }
    }
}

/// A price attached to a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPrice {
    pub id: Uuid,

    pub amount_type: AmountType,

    /// Amount in smallest currency unit (fixed prices only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_amount: Option<i64>,

    /// ISO 4217 code, lowercase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<RecurringInterval>,

    #[serde(default)]
    pub is_archived: bool,
}

impl ProductPrice {
    /// Format for display (e.g., "$10.00", "€5.00 / month", "Free")
    pub fn display(&self) -> String {
        let base = match self.amount_type {
            AmountType::Free => "Free".to_string(),
            AmountType::Custom => "Pay what you want".to_string(),
            _ => match (self.price_amount, self.price_currency.as_deref()) {
                (Some(amount), Some(currency)) => format_amount(amount, currency),
                _ => "Variable".to_string(),
            },
        };

        match self.recurring_interval {
            Some(interval) if self.amount_type != AmountType::Free => {
                format!("{} / {}", base, interval.as_str())
            }
            _ => base,
        }
    }
}

fn format_amount(amount: i64, currency: &str) -> String {
    let code = currency.to_lowercase();
    let symbol = match code.as_str() {
        "usd" => "$",
        "eur" => "€",
        "gbp" => "£",
        "jpy" => "¥",
        _ => "",
    };

    let value = if code == "jpy" {
        amount.to_string()
    } else {
        format!("{:.2}", amount as f64 / 100.0)
    };

    if symbol.is_empty() {
        format!("{} {}", value, code.to_uppercase())
    } else {
        format!("{}{}", symbol, value)
    }
}

/// A product in the billing catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub is_recurring: bool,

    #[serde(default)]
    pub is_archived: bool,

    #[serde(default)]
    pub prices: Vec<ProductPrice>,
}

impl Product {
    /// Create a product with no prices
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            is_recurring: false,
            is_archived: false,
            prices: Vec::new(),
        }
    }

    /// Builder: add a price
    pub fn with_price(mut self, price: ProductPrice) -> Self {
        self.prices.push(price);
        self
    }

    /// First non-archived price, if any
    pub fn primary_price(&self) -> Option<&ProductPrice> {
        self.prices.iter().find(|p| !p.is_archived)
    }

    /// Relative checkout link for this product
    pub fn checkout_path(&self, base: &str, param: &str) -> String {
        format!("{}?{}={}", base, param, self.id)
    }
}
