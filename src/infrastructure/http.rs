use crate::domain::checkout::{ApiError, PaymentsDetailsRequest, PaymentsRequest, PaymentsResponse};
use crate::domain::ports::CheckoutApi;
use crate::error::{ApiException, CheckoutError, GatewayError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const API_VERSION: &str = "v68";
const TEST_BASE_URL: &str = "https://checkout-test.adyen.com";
const API_KEY_HEADER: &str = "x-api-key";

/// Gateway environment a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Test,
    Live,
}

impl Environment {
    /// Only the exact string `LIVE` selects the live environment.
    pub fn from_property(property: Option<&str>) -> Self {
        match property {
            Some("LIVE") => Self::Live,
            _ => Self::Test,
        }
    }

    pub fn base_url(&self, live_url_prefix: Option<&str>) -> Result<String> {
        match self {
            Self::Test => Ok(format!("{TEST_BASE_URL}/{API_VERSION}")),
            Self::Live => {
                let prefix = live_url_prefix.ok_or_else(|| {
                    CheckoutError::ConfigError(
                        "live environment requires a live URL prefix".to_string(),
                    )
                })?;
                Ok(format!(
                    "https://{prefix}-checkout-live.adyenpayments.com/checkout/{API_VERSION}"
                ))
            }
        }
    }
}

/// Checkout SDK speaking JSON over HTTPS.
///
/// Timeouts are whatever the underlying `reqwest::Client` enforces.
pub struct HttpCheckoutApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCheckoutApi {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<PaymentsResponse, GatewayError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "posting checkout request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(GatewayError::transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(GatewayError::transport)?;

        if !status.is_success() {
            let error = serde_json::from_slice::<ApiError>(&bytes).ok();
            let message = error
                .as_ref()
                .and_then(|e| e.message.clone())
                .unwrap_or_else(|| format!("HTTP status {}", status.as_u16()));
            let mut exception = ApiException::new(message, status.as_u16());
            if let Some(error) = error {
                exception = exception.with_error(error);
            }
            return Err(exception.into());
        }

        serde_json::from_slice(&bytes).map_err(GatewayError::Decode)
    }
}

#[async_trait]
impl CheckoutApi for HttpCheckoutApi {
    async fn payments(
        &self,
        request: &PaymentsRequest,
    ) -> std::result::Result<PaymentsResponse, GatewayError> {
        self.post("payments", request).await
    }

    async fn payments_details(
        &self,
        request: &PaymentsDetailsRequest,
    ) -> std::result::Result<PaymentsResponse, GatewayError> {
        self.post("payments/details", request).await
    }
}
