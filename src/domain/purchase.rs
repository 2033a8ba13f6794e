use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse-grained payment status understood by the billing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentServiceProviderResult {
    Initialised,
    Authorised,
    RedirectShopper,
    Pending,
    Refused,
    Cancelled,
    Error,
    Undefined,
}

impl PaymentServiceProviderResult {
    /// Maps a gateway result code onto a provider status.
    ///
    /// Codes the gateway may add later fall through to `Undefined`.
    pub fn from_result_code(result_code: &str) -> Self {
        match result_code {
            "Authorised" => Self::Authorised,
            "RedirectShopper" | "IdentifyShopper" | "ChallengeShopper" | "PresentToShopper" => {
                Self::RedirectShopper
            }
            "Received" | "Pending" | "AuthenticationNotRequired" | "AuthenticationFinished" => {
                Self::Pending
            }
            "Refused" => Self::Refused,
            "Cancelled" => Self::Cancelled,
            "Error" => Self::Error,
            _ => Self::Undefined,
        }
    }
}

/// Normalized outcome of an authorization handed back to the billing engine.
///
/// Fields without a first-class slot travel in `additional_data`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PurchaseResult {
    pub result: Option<PaymentServiceProviderResult>,
    pub result_code: Option<String>,
    pub reason: Option<String>,
    pub psp_reference: Option<String>,
    pub payment_transaction_external_key: Option<String>,
    pub form_url: Option<String>,
    pub form_method: Option<String>,
    pub form_parameter: Vec<(String, String)>,
    pub additional_data: BTreeMap<String, String>,
}

impl PurchaseResult {
    /// An `Error` result carrying only a human readable reason.
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            result: Some(PaymentServiceProviderResult::Error),
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn with_payment_transaction_external_key(mut self, key: impl Into<String>) -> Self {
        self.payment_transaction_external_key = Some(key.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.result == Some(PaymentServiceProviderResult::Error)
    }
}
