//! # Polar Configuration
//!
//! Configuration management for the Polar integration.
//! All secrets are loaded from environment variables.

use polar_core::BillingError;
use std::env;
use std::fmt;
use std::str::FromStr;

const PRODUCTION_API_URL: &str = "https://api.polar.sh";
const SANDBOX_API_URL: &str = "https://sandbox-api.polar.sh";

/// Which Polar environment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolarMode {
    Sandbox,
    #[default]
    Production,
}

impl PolarMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolarMode::Sandbox => "sandbox",
            PolarMode::Production => "production",
        }
    }

    /// API host for this mode
    pub fn api_base_url(&self) -> &'static str {
        match self {
            PolarMode::Sandbox => SANDBOX_API_URL,
            PolarMode::Production => PRODUCTION_API_URL,
        }
    }
}

impl FromStr for PolarMode {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sandbox" => Ok(PolarMode::Sandbox),
            "production" => Ok(PolarMode::Production),
            other => Err(BillingError::Configuration(format!(
                "POLAR_MODE must be 'sandbox' or 'production', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for PolarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polar API configuration
#[derive(Clone)]
pub struct PolarConfig {
    /// Organization access token
    pub access_token: String,

    /// Webhook signing secret
    pub webhook_secret: String,

    pub mode: PolarMode,

    /// Post-checkout redirect
    pub success_url: Option<String>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

impl fmt::Debug for PolarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolarConfig")
            .field("access_token", &"***")
            .field("webhook_secret", &"***")
            .field("mode", &self.mode)
            .field("success_url", &self.success_url)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl PolarConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `POLAR_ACCESS_TOKEN`
    /// - `POLAR_WEBHOOK_SECRET`
    ///
    /// Optional:
    /// - `POLAR_MODE` (`sandbox` | `production`, default `production`)
    /// - `POLAR_SUCCESS_URL` (absolute URL)
    /// - `POLAR_API_BASE_URL`
    pub fn from_env() -> Result<Self, BillingError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BillingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match non_empty("POLAR_MODE") {
            Some(raw) => raw.parse()?,
            None => PolarMode::default(),
        };

        let access_token = non_empty("POLAR_ACCESS_TOKEN").ok_or_else(|| {
            BillingError::Configuration("POLAR_ACCESS_TOKEN is required".to_string())
        })?;

        let webhook_secret = non_empty("POLAR_WEBHOOK_SECRET").ok_or_else(|| {
            BillingError::Configuration("POLAR_WEBHOOK_SECRET is required".to_string())
        })?;

        let success_url = non_empty("POLAR_SUCCESS_URL")
            .map(|raw| validate_url("POLAR_SUCCESS_URL", &raw))
            .transpose()?;

        let api_base_url = match non_empty("POLAR_API_BASE_URL") {
            Some(raw) => validate_url("POLAR_API_BASE_URL", &raw)?,
            None => mode.api_base_url().to_string(),
        };

        Ok(Self {
            access_token,
            webhook_secret,
            mode,
            success_url,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        access_token: impl Into<String>,
        webhook_secret: impl Into<String>,
        mode: PolarMode,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            webhook_secret: webhook_secret.into(),
            mode,
            success_url: None,
            api_base_url: mode.api_base_url().to_string(),
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set success URL
    pub fn with_success_url(mut self, url: impl Into<String>) -> Self {
        self.success_url = Some(url.into());
        self
    }
}

fn validate_url(key: &str, raw: &str) -> Result<String, BillingError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| BillingError::Configuration(format!("{} is not a valid URL: {}", key, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BillingError::Configuration(format!(
            "{} must be an http(s) URL",
            key
        )));
    }

    Ok(raw.trim().to_string())
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
    fn test_minimal_config_defaults_to_production() {
        let config = PolarConfig::from_lookup(lookup(&[
            ("POLAR_ACCESS_TOKEN", "polar_oat_abc"),
            ("POLAR_WEBHOOK_SECRET", "whsec_123"),
        ]))
        .unwrap();

        assert_eq!(config.mode, PolarMode::Production);
        assert_eq!(config.api_base_url, "https://api.polar.sh");
        assert!(config.success_url.is_none());
    }

    #[test]
    fn test_sandbox_mode() {
        let config = PolarConfig::from_lookup(lookup(&[
            ("POLAR_MODE", "sandbox"),
            ("POLAR_ACCESS_TOKEN", "polar_oat_abc"),
            ("POLAR_WEBHOOK_SECRET", "whsec_123"),
            ("POLAR_SUCCESS_URL", "https://example.com/thanks"),
        ]))
        .unwrap();

        assert_eq!(config.mode, PolarMode::Sandbox);
        assert_eq!(config.api_base_url, "https://sandbox-api.polar.sh");
        assert_eq!(config.success_url.as_deref(), Some("https://example.com/thanks"));
    }

    #[test]
    fn test_missing_access_token() {
        let err = PolarConfig::from_lookup(lookup(&[("POLAR_WEBHOOK_SECRET", "whsec_123")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: POLAR_ACCESS_TOKEN is required"
        );
    }

    #[test]
    fn test_empty_webhook_secret() {
        let err = PolarConfig::from_lookup(lookup(&[
            ("POLAR_ACCESS_TOKEN", "polar_oat_abc"),
            ("POLAR_WEBHOOK_SECRET", ""),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("POLAR_WEBHOOK_SECRET is required"));
    }

    #[test]
    fn test_invalid_mode() {
        let err = PolarConfig::from_lookup(lookup(&[
            ("POLAR_MODE", "staging"),
            ("POLAR_ACCESS_TOKEN", "polar_oat_abc"),
            ("POLAR_WEBHOOK_SECRET", "whsec_123"),
        ]))
        .unwrap_err();
        assert!(matches!(err, BillingError::Configuration(_)));
    }

    #[test]
    fn test_invalid_success_url() {
        let err = PolarConfig::from_lookup(lookup(&[
            ("POLAR_ACCESS_TOKEN", "polar_oat_abc"),
            ("POLAR_WEBHOOK_SECRET", "whsec_123"),
            ("POLAR_SUCCESS_URL", "not a url"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("POLAR_SUCCESS_URL"));
    }

    #[test]
    fn test_auth_header_and_debug_redaction() {
        let config = PolarConfig::new("polar_oat_abc", "whsec_123", PolarMode::Sandbox)
            .with_api_base_url("http://localhost:9999/");

        assert_eq!(config.auth_header(), "Bearer polar_oat_abc");
        assert_eq!(config.api_base_url, "http://localhost:9999");

        let debug = format!("{:?}", config);
        assert!(!debug.contains("polar_oat_abc"));
        assert!(!debug.contains("whsec_123"));
    }
}
