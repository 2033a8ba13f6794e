use crate::domain::call_result::{CallResult, ErrorStatus};
use crate::domain::checkout::{PaymentsDetailsRequest, PaymentsRequest, PaymentsResponse};
use crate::domain::ports::{CheckoutApiBox, CheckoutClient};
use crate::error::{GatewayError, root_cause};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;
use std::future::Future;
use std::time::Instant;
use tracing::{error, info};

/// Checkout client that turns every SDK outcome into a [`CallResult`].
///
/// Each call is a single attempt: a fault is logged, classified and
/// returned immediately.
pub struct CheckoutApiClient {
    checkout_api: CheckoutApiBox,
}

impl CheckoutApiClient {
    pub fn new(checkout_api: CheckoutApiBox) -> Self {
        Self { checkout_api }
    }

    async fn call_api<Req, Fut>(&self, request: &Req, call: Fut) -> CallResult<PaymentsResponse>
    where
        Req: Serialize + Debug + Sync,
        Fut: Future<Output = Result<PaymentsResponse, GatewayError>> + Send,
    {
        info!(request = %loggable_json(request), "Checkout API request");

        let start = Instant::now();
        match call.await {
            Ok(response) => {
                let duration_ms = elapsed_ms(start);
                log_response(&response);
                info!(duration_ms, "Checkout call duration");
                CallResult::successful(response, duration_ms)
            }
            Err(fault) => {
                let duration_ms = elapsed_ms(start);
                error!(duration_ms, fault = %fault, "Checkout API exception");
                handle_fault(fault)
            }
        }
    }
}

#[async_trait]
impl CheckoutClient for CheckoutApiClient {
    async fn create_payment(&self, request: &PaymentsRequest) -> CallResult<PaymentsResponse> {
        self.call_api(request, self.checkout_api.payments(request))
            .await
    }

    async fn payment_details(
        &self,
        request: &PaymentsDetailsRequest,
    ) -> CallResult<PaymentsResponse> {
        self.call_api(request, self.checkout_api.payments_details(request))
            .await
    }
}

fn handle_fault(fault: GatewayError) -> CallResult<PaymentsResponse> {
    let status = ErrorStatus::classify(&fault);
    error!(
        ?status,
        root_cause = %root_cause(&fault),
        "Error sending request"
    );
    CallResult::failed(status, fault)
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Renders `value` as JSON for the log, falling back to its `Debug` form.
pub fn loggable_json<T: Serialize + Debug + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(_) => {
            info!("Unable to convert log object to JSON");
            format!("{value:?}")
        }
    }
}

fn log_response(response: &PaymentsResponse) {
    let details = response
        .details
        .as_ref()
        .map(|details| format!("{details:?}"));
    let action = response.action.as_ref();

    info!(
        result_code = ?response.result_code,
        psp_reference = ?response.psp_reference,
        merchant_reference = ?response.merchant_reference,
        refusal_reason = ?response.refusal_reason,
        refusal_reason_code = ?response.refusal_reason_code,
        details = ?details,
        action_type = ?action.and_then(|a| a.r#type.as_deref()),
        action_method = ?action.and_then(|a| a.method.as_deref()),
        action_payment_method_type = ?action.and_then(|a| a.payment_method_type.as_deref()),
        "Checkout API SUCCESS"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;

    #[derive(Debug)]
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not today"))
        }
    }

    #[test]
    fn test_loggable_json_falls_back_to_debug() {
        assert_eq!(loggable_json(&Unserializable), "Unserializable");
    }

    #[test]
    fn test_loggable_json_serializes_request() {
        let request = PaymentsDetailsRequest {
            payment_data: "token".to_string(),
            details: Default::default(),
        };
        assert_eq!(
            loggable_json(&request),
            r#"{"paymentData":"token","details":{}}"#
        );
    }
}
