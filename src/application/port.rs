use super::translator::{CheckoutPaymentsResult, MERCHANT_ACCOUNT_CODE};
use crate::domain::call_result::{CallResult, FailedCall};
use crate::domain::checkout::PaymentsResponse;
use crate::domain::payment::{PaymentData, UserData};
use crate::domain::ports::{ClientFactoryBox, RequestFactoryBox};
use crate::domain::purchase::PurchaseResult;
use tracing::{info, warn};

/// Entry point the billing engine uses to authorize redirect-based payments.
///
/// Owns the request and client factories and turns every call outcome into
/// a [`PurchaseResult`].
pub struct CheckoutPaymentPort {
    request_factory: RequestFactoryBox,
    client_factory: ClientFactoryBox,
}

impl CheckoutPaymentPort {
    pub fn new(request_factory: RequestFactoryBox, client_factory: ClientFactoryBox) -> Self {
        Self {
            request_factory,
            client_factory,
        }
    }

    /// Starts a redirect payment, or completes it when `is_complete` is set.
    ///
    /// The first leg calls `/payments`; the completion leg sends the
    /// continuation token and shopper details to `/payments/details`.
    pub async fn authorise_redirect_payment(
        &self,
        is_complete: bool,
        merchant_account: &str,
        payment_data: &PaymentData,
        user_data: &UserData,
    ) -> PurchaseResult {
        let external_key = payment_data.payment_transaction_external_key();
        let country_code = payment_data.payment_info().country_code.as_str();

        let client = match self.client_factory.client_for(country_code) {
            Ok(client) => client,
            Err(e) => {
                warn!(country_code, error = %e, "Unable to create checkout client");
                return failure(e.to_string(), merchant_account, external_key);
            }
        };

        let call_result = if is_complete {
            match self
                .request_factory
                .complete_payment(merchant_account, payment_data, user_data)
            {
                Ok(request) => client.payment_details(&request).await,
                Err(e) => return failure(e.to_string(), merchant_account, external_key),
            }
        } else {
            match self
                .request_factory
                .create_payment(merchant_account, payment_data, user_data)
            {
                Ok(request) => client.create_payment(&request).await,
                Err(e) => return failure(e.to_string(), merchant_account, external_key),
            }
        };

        let result = to_purchase_result(call_result, merchant_account)
            .with_payment_transaction_external_key(external_key);
        info!(
            external_key,
            result = ?result.result,
            result_code = ?result.result_code,
            "Checkout authorisation finished"
        );
        result
    }
}

/// Maps a call outcome onto the billing engine's result type.
pub fn to_purchase_result(
    call_result: CallResult<PaymentsResponse>,
    merchant_account: &str,
) -> PurchaseResult {
    match call_result {
        CallResult::Successful { response, .. } => {
            CheckoutPaymentsResult::from_response(&response, Some(merchant_account))
                .to_purchase_result()
        }
        CallResult::Failed(failed) => failed_purchase_result(&failed, merchant_account),
    }
}

/// Error result for a failed call.
///
/// Prefers the message and psp reference the gateway reported over the
/// root cause of the fault.
pub fn failed_purchase_result(failed: &FailedCall, merchant_account: &str) -> PurchaseResult {
    let api_error = failed.fault.api_error();
    let reason = api_error
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| failed.root_cause.clone());

    let mut result = PurchaseResult::error(reason);
    result.psp_reference = api_error.and_then(|e| e.psp_reference.clone());
    result
        .additional_data
        .insert(MERCHANT_ACCOUNT_CODE.to_string(), merchant_account.to_string());
    result
}

fn failure(reason: String, merchant_account: &str, external_key: &str) -> PurchaseResult {
    let mut result =
        PurchaseResult::error(reason).with_payment_transaction_external_key(external_key);
    result
        .additional_data
        .insert(MERCHANT_ACCOUNT_CODE.to_string(), merchant_account.to_string());
    result
}
