#![allow(dead_code)]

use async_trait::async_trait;
use checkout_gateway::domain::call_result::CallResult;
use checkout_gateway::domain::checkout::{
    CheckoutAction, InputDetail, PaymentsDetailsRequest, PaymentsRequest, PaymentsResponse,
};
use checkout_gateway::domain::payment::{
    KlarnaInfo, PaymentData, PaymentInfo, PaymentMethodInfo, UserData,
};
use checkout_gateway::domain::ports::{
    CheckoutApi, CheckoutClient, CheckoutClientBox, ClientFactory, RequestFactory,
};
use checkout_gateway::error::{CheckoutError, GatewayError, Result};
use checkout_gateway::infrastructure::request_factory::DefaultRequestFactory;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::{Arc, Mutex};

pub const MERCHANT_ACCOUNT: &str = "TestAccount";
pub const PSP_REFERENCE: &str = "8815329842815468";
pub const URL: &str = "https://checkout-test.example.com/klarna/redirect";
pub const PAYMENT_DATA: &str = "Ab02b4c0!BQABAgCW5sxB4e/==";

pub fn klarna_payment_data(country_code: &str) -> PaymentData {
    let info = PaymentInfo::new(country_code, PaymentMethodInfo::Klarna(KlarnaInfo::default()))
        .with_return_url("https://shop.example.com/return");
    PaymentData::new(dec!(10), "EUR", "b1c4e3a2-ext-key", info).unwrap()
}

pub fn redirect_shopper_response() -> PaymentsResponse {
    let mut data = serde_json::Map::new();
    data.insert("authorization_token".to_string(), json!("5e0a44a1"));

    PaymentsResponse {
        result_code: Some("RedirectShopper".to_string()),
        details: Some(vec![InputDetail {
            key: Some("redirectResult".to_string()),
            r#type: Some("text".to_string()),
        }]),
        action: Some(CheckoutAction {
            r#type: Some("redirect".to_string()),
            method: Some("GET".to_string()),
            url: Some(URL.to_string()),
            payment_data: Some(PAYMENT_DATA.to_string()),
            payment_method_type: Some("klarna".to_string()),
            data: Some(data),
        }),
        ..PaymentsResponse::default()
    }
}

pub fn authorised_response() -> PaymentsResponse {
    PaymentsResponse {
        result_code: Some("Authorised".to_string()),
        psp_reference: Some(PSP_REFERENCE.to_string()),
        merchant_reference: Some("b1c4e3a2-ext-key".to_string()),
        ..PaymentsResponse::default()
    }
}

/// Checkout SDK double answering every call with a scripted outcome.
pub struct StubCheckoutApi {
    outcome: Mutex<Option<std::result::Result<PaymentsResponse, GatewayError>>>,
}

impl StubCheckoutApi {
    pub fn returning(outcome: std::result::Result<PaymentsResponse, GatewayError>) -> Self {
        Self {
            outcome: Mutex::new(Some(outcome)),
        }
    }

    fn next(&self) -> std::result::Result<PaymentsResponse, GatewayError> {
        self.outcome
            .lock()
            .unwrap()
            .take()
            .expect("stub called more than once")
    }
}

#[async_trait]
impl CheckoutApi for StubCheckoutApi {
    async fn payments(
        &self,
        _request: &PaymentsRequest,
    ) -> std::result::Result<PaymentsResponse, GatewayError> {
        self.next()
    }

    async fn payments_details(
        &self,
        _request: &PaymentsDetailsRequest,
    ) -> std::result::Result<PaymentsResponse, GatewayError> {
        self.next()
    }
}

/// Shared state behind [`StubClientFactory`] so tests can inspect calls.
#[derive(Default)]
pub struct StubState {
    pub result: Mutex<Option<CallResult<PaymentsResponse>>>,
    pub countries: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<&'static str>>,
}

pub struct StubClient {
    state: Arc<StubState>,
}

impl StubClient {
    fn record(&self, call: &'static str) -> CallResult<PaymentsResponse> {
        self.state.calls.lock().unwrap().push(call);
        self.state
            .result
            .lock()
            .unwrap()
            .take()
            .expect("no scripted call result")
    }
}

#[async_trait]
impl CheckoutClient for StubClient {
    async fn create_payment(&self, _request: &PaymentsRequest) -> CallResult<PaymentsResponse> {
        self.record("payments")
    }

    async fn payment_details(
        &self,
        _request: &PaymentsDetailsRequest,
    ) -> CallResult<PaymentsResponse> {
        self.record("payments/details")
    }
}

pub struct StubClientFactory {
    pub state: Arc<StubState>,
}

impl StubClientFactory {
    pub fn returning(result: CallResult<PaymentsResponse>) -> Self {
        let state = StubState::default();
        *state.result.lock().unwrap() = Some(result);
        Self {
            state: Arc::new(state),
        }
    }
}

impl ClientFactory for StubClientFactory {
    fn client_for(&self, country_code: &str) -> Result<CheckoutClientBox> {
        self.state
            .countries
            .lock()
            .unwrap()
            .push(country_code.to_string());
        Ok(Box::new(StubClient {
            state: Arc::clone(&self.state),
        }))
    }
}

/// Client factory that cannot build a client, e.g. for a misconfigured country.
pub struct FailingClientFactory;

impl ClientFactory for FailingClientFactory {
    fn client_for(&self, country_code: &str) -> Result<CheckoutClientBox> {
        Err(CheckoutError::ConfigError(format!(
            "no endpoint for {country_code}"
        )))
    }
}

/// Request factory that skips validation of the continuation token.
pub struct LenientRequestFactory;

impl RequestFactory for LenientRequestFactory {
    fn create_payment(
        &self,
        merchant_account: &str,
        payment_data: &PaymentData,
        user_data: &UserData,
    ) -> Result<PaymentsRequest> {
        DefaultRequestFactory::new().create_payment(merchant_account, payment_data, user_data)
    }

    fn complete_payment(
        &self,
        _merchant_account: &str,
        _payment_data: &PaymentData,
        _user_data: &UserData,
    ) -> Result<PaymentsDetailsRequest> {
        Ok(PaymentsDetailsRequest::default())
    }
}
