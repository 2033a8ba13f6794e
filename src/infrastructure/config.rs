use crate::domain::ports::ConfigProperties;
use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

const ENV_PREFIX: &str = "CHECKOUT_";

/// Plugin configuration for the checkout gateway.
///
/// Loaded from a JSON document or from `CHECKOUT_*` environment variables.
/// Read-only once built, so a single instance can be shared by every caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfigProperties {
    pub environment: Option<String>,
    /// Key used for countries without a dedicated entry in `api_keys`.
    pub api_key: Option<String>,
    /// Per-country API keys, keyed by upper-case ISO country code.
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,
    pub live_url_prefix: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl CheckoutConfigProperties {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_json(document: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(document)?;
        config.api_keys = config
            .api_keys
            .into_iter()
            .map(|(country, key)| (country.to_ascii_uppercase(), key))
            .collect();
        Ok(config)
    }

    /// Builds the configuration from `(name, value)` pairs.
    ///
    /// Recognised names: `CHECKOUT_ENVIRONMENT`, `CHECKOUT_API_KEY`,
    /// `CHECKOUT_API_KEY_<COUNTRY>`, `CHECKOUT_LIVE_URL_PREFIX` and
    /// `CHECKOUT_TIMEOUT_MS`. Anything else is ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (name, value) in vars {
            let Some(name) = name.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "ENVIRONMENT" => config.environment = Some(value.into()),
                "API_KEY" => config.api_key = Some(value.into()),
                "LIVE_URL_PREFIX" => config.live_url_prefix = Some(value.into()),
                "TIMEOUT_MS" => {
                    let raw: String = value.into();
                    let timeout = raw.parse().map_err(|_| {
                        CheckoutError::ConfigError(format!("Invalid CHECKOUT_TIMEOUT_MS: {raw}"))
                    })?;
                    config.timeout_ms = Some(timeout);
                }
                other => {
                    if let Some(country) = other.strip_prefix("API_KEY_") {
                        config
                            .api_keys
                            .insert(country.to_ascii_uppercase(), value.into());
                    }
                }
            }
        }
        Ok(config)
    }
}

impl ConfigProperties for CheckoutConfigProperties {
    fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    fn api_key(&self, country_code: &str) -> Option<&str> {
        self.api_keys
            .get(&country_code.to_ascii_uppercase())
            .or(self.api_key.as_ref())
            .map(String::as_str)
    }

    fn live_url_prefix(&self) -> Option<&str> {
        self.live_url_prefix.as_deref()
    }

    fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }
}
