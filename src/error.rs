use crate::domain::checkout::ApiError;
use std::error::Error as StdError;
use thiserror::Error;

/// Errors raised while preparing or wiring a checkout call.
///
/// Faults raised by the gateway itself never surface as `CheckoutError`: the
/// call client turns them into a failed `CallResult` instead.
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Faults the checkout SDK may raise for a single API call.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The gateway answered and rejected the request.
    #[error(transparent)]
    Api(#[from] ApiException),
    /// The request never reached the gateway, or no response came back.
    #[error("Request not sent: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
    /// A response arrived but did not match the checkout schema.
    #[error("Malformed response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl GatewayError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Transport(err.into())
    }

    /// The structured error body returned by the gateway, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(exception) => exception.error.as_ref(),
            _ => None,
        }
    }
}

/// An API-level rejection reported by the gateway.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiException {
    pub message: String,
    pub status_code: u16,
    pub error: Option<ApiError>,
}

impl ApiException {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
            error: None,
        }
    }

    pub fn with_error(mut self, error: ApiError) -> Self {
        self.error = Some(error);
        self
    }
}

/// Walks the `source()` chain of `err` and returns its last link.
///
/// An error without a source is its own root cause.
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current
}
