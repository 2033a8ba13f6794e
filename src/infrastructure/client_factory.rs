use super::api_client::CheckoutApiClient;
use super::http::{Environment, HttpCheckoutApi};
use crate::domain::ports::{CheckoutClientBox, ClientFactory, SharedConfig};
use crate::error::Result;
use std::time::Duration;
use tracing::{debug, warn};

/// Placeholder key sent when no key is configured for a country.
///
/// The gateway rejects it; nothing is validated locally.
pub const KEY_NOT_FOUND: &str = "KEY_NOT_FOUND";

/// Builds a fresh checkout client for every country lookup.
///
/// The configuration is shared read-only; clients are neither pooled nor
/// cached.
#[derive(Clone)]
pub struct CheckoutClientFactory {
    config: SharedConfig,
}

impl CheckoutClientFactory {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn environment(&self) -> Environment {
        Environment::from_property(self.config.environment())
    }

    pub fn api_key(&self, country_code: &str) -> &str {
        self.config.api_key(country_code).unwrap_or_else(|| {
            warn!(country_code, "No checkout API key configured");
            KEY_NOT_FOUND
        })
    }

    pub(crate) fn http_api(&self, country_code: &str) -> Result<HttpCheckoutApi> {
        let environment = self.environment();
        let base_url = environment.base_url(self.config.live_url_prefix())?;
        debug!(country_code, ?environment, %base_url, "Creating checkout client");
        HttpCheckoutApi::new(
            self.api_key(country_code),
            base_url,
            self.config.timeout_ms().map(Duration::from_millis),
        )
    }
}

impl ClientFactory for CheckoutClientFactory {
    fn client_for(&self, country_code: &str) -> Result<CheckoutClientBox> {
        let api = self.http_api(country_code)?;
        Ok(Box::new(CheckoutApiClient::new(Box::new(api))))
    }
}
