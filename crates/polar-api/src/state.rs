//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the billing provider, webhook verifier and configuration.

use chrono::{DateTime, Utc};
use polar_client::{
    LoggingWebhookHandler, PolarClient, PolarConfig, PolarMode, WebhookHandler, WebhookVerifier,
};
use polar_core::{BillingError, SharedBillingProvider};
use std::str::FromStr;
use std::sync::Arc;

/// Which example layout the server presents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppFlavor {
    /// Utility-styled page, routes at the root
    #[default]
    Minimal,
    /// Sectioned page, checkout/portal under `/api`
    Showcase,
}

impl AppFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppFlavor::Minimal => "minimal",
            AppFlavor::Showcase => "showcase",
        }
    }

    /// Checkout path and the query parameter carrying the product id
    pub fn checkout_link(&self) -> (&'static str, &'static str) {
        match self {
            AppFlavor::Minimal => ("/checkout", "products"),
            AppFlavor::Showcase => ("/api/checkout", "product"),
        }
    }

    pub fn portal_path(&self) -> &'static str {
        match self {
            AppFlavor::Minimal => "/portal",
            AppFlavor::Showcase => "/api/portal",
        }
    }
}

impl FromStr for AppFlavor {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(AppFlavor::Minimal),
            "showcase" => Ok(AppFlavor::Showcase),
            other => Err(BillingError::Configuration(format!(
                "APP_FLAVOR must be 'minimal' or 'showcase', got '{}'",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Page layout
    pub flavor: AppFlavor,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, BillingError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BillingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                BillingError::Configuration(format!("PORT must be a port number, got '{}'", raw))
            })?,
            None => 3000,
        };

        let flavor = match lookup("APP_FLAVOR").filter(|f| !f.trim().is_empty()) {
            Some(raw) => raw.parse()?,
            None => AppFlavor::default(),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            flavor,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        })
    }

    /// Address to bind to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            flavor: AppFlavor::default(),
            environment: "development".to_string(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Billing service
    pub provider: SharedBillingProvider,
    /// Webhook signature verifier
    pub verifier: Arc<WebhookVerifier>,
    /// Receives verified webhook events
    pub webhook_handler: Arc<dyn WebhookHandler>,
    /// Post-checkout redirect passed to new checkouts
    pub success_url: Option<String>,
    /// Polar environment
    pub mode: PolarMode,
    /// Application config
    pub config: AppConfig,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state from the environment, failing fast on invalid configuration
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let polar_config = PolarConfig::from_env()?;
        let client = PolarClient::new(polar_config.clone())?;

        Ok(Self::from_parts(config, &polar_config, Arc::new(client)))
    }

    /// Assemble state around any billing provider
    pub fn from_parts(
        config: AppConfig,
        polar_config: &PolarConfig,
        provider: SharedBillingProvider,
    ) -> Self {
        Self {
            provider,
            verifier: Arc::new(WebhookVerifier::from_raw_secret(
                &polar_config.webhook_secret,
            )),
            webhook_handler: Arc::new(LoggingWebhookHandler),
            success_url: polar_config.success_url.clone(),
            mode: polar_config.mode,
            config,
            started_at: Utc::now(),
        }
    }

    /// Builder: replace the webhook event handler
    pub fn with_webhook_handler(mut self, handler: Arc<dyn WebhookHandler>) -> Self {
        self.webhook_handler = handler;
        self
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.flavor, AppFlavor::Minimal);
        assert!(!config.is_production());
    }

    #[test]
    fn test_app_config_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("APP_FLAVOR", "Showcase"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.flavor, AppFlavor::Showcase);
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_flavor() {
        assert!(AppConfig::from_lookup(lookup(&[("APP_FLAVOR", "fancy")])).is_err());
    }

    #[test]
    fn test_flavor_links() {
        assert_eq!(AppFlavor::Minimal.checkout_link(), ("/checkout", "products"));
        assert_eq!(AppFlavor::Showcase.checkout_link(), ("/api/checkout", "product"));
        assert_eq!(AppFlavor::Showcase.portal_path(), "/api/portal");
    }
}
