use super::call_result::CallResult;
use super::checkout::{PaymentsDetailsRequest, PaymentsRequest, PaymentsResponse};
use super::payment::{PaymentData, UserData};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// The two operations of the gateway's checkout SDK.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    async fn payments(
        &self,
        request: &PaymentsRequest,
    ) -> std::result::Result<PaymentsResponse, GatewayError>;

    async fn payments_details(
        &self,
        request: &PaymentsDetailsRequest,
    ) -> std::result::Result<PaymentsResponse, GatewayError>;
}

/// A checkout client whose calls always end in a [`CallResult`].
#[async_trait]
pub trait CheckoutClient: Send + Sync {
    async fn create_payment(&self, request: &PaymentsRequest) -> CallResult<PaymentsResponse>;

    async fn payment_details(
        &self,
        request: &PaymentsDetailsRequest,
    ) -> CallResult<PaymentsResponse>;
}

/// Resolves a checkout client scoped to a country.
pub trait ClientFactory: Send + Sync {
    fn client_for(&self, country_code: &str) -> Result<CheckoutClientBox>;
}

/// Builds gateway requests from billing domain data.
pub trait RequestFactory: Send + Sync {
    fn create_payment(
        &self,
        merchant_account: &str,
        payment_data: &PaymentData,
        user_data: &UserData,
    ) -> Result<PaymentsRequest>;

    fn complete_payment(
        &self,
        merchant_account: &str,
        payment_data: &PaymentData,
        user_data: &UserData,
    ) -> Result<PaymentsDetailsRequest>;
}

/// Read-only view of the plugin configuration.
pub trait ConfigProperties: Send + Sync {
    fn environment(&self) -> Option<&str>;
    fn api_key(&self, country_code: &str) -> Option<&str>;

    fn live_url_prefix(&self) -> Option<&str> {
        None
    }

    fn timeout_ms(&self) -> Option<u64> {
        None
    }
}

pub type CheckoutApiBox = Box<dyn CheckoutApi>;
pub type CheckoutClientBox = Box<dyn CheckoutClient>;
pub type ClientFactoryBox = Box<dyn ClientFactory>;
pub type RequestFactoryBox = Box<dyn RequestFactory>;
pub type SharedConfig = Arc<dyn ConfigProperties>;
