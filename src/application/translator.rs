//! Flattening of checkout responses into [`PurchaseResult`]s.
//!
//! The billing ledger only stores flat string maps, so every response field
//! without a first-class slot is copied into `additional_data` under a fixed
//! key. Values that are themselves maps are stored as JSON strings.

use crate::domain::checkout::PaymentsResponse;
use crate::domain::purchase::{PaymentServiceProviderResult, PurchaseResult};
use serde_json::Value;
use std::collections::BTreeMap;

pub const FORM_METHOD: &str = "formMethod";
pub const FORM_URL: &str = "formUrl";
pub const PAYMENT_METHOD: &str = "paymentMethod";
pub const PAYMENT_DATA: &str = "paymentData";
pub const MERCHANT_ACCOUNT_CODE: &str = "merchantAccountCode";
pub const RESULT_KEYS: &str = "resultKeys";
pub const FORM_PARAMETER: &str = "formParameter";

/// Flat view of a checkout response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckoutPaymentsResult {
    pub result_code: Option<String>,
    pub psp_reference: Option<String>,
    pub refusal_reason: Option<String>,
    pub form_method: Option<String>,
    pub form_url: Option<String>,
    pub payment_method: Option<String>,
    /// Continuation token needed by the details call.
    pub payment_data: Option<String>,
    /// Field name to declared type for the input the next step needs.
    pub result_keys: BTreeMap<String, String>,
    /// Redirect form fields, in the order the gateway sent them.
    pub form_parameter: Vec<(String, String)>,
    pub merchant_account: Option<String>,
}

impl CheckoutPaymentsResult {
    /// Pulls the action and details blocks of `response` up to the top level.
    pub fn from_response(response: &PaymentsResponse, merchant_account: Option<&str>) -> Self {
        let action = response.action.as_ref();

        let result_keys = response
            .details
            .iter()
            .flatten()
            .filter_map(|detail| {
                let key = detail.key.clone()?;
                Some((key, detail.r#type.clone().unwrap_or_default()))
            })
            .collect();

        let form_parameter = action
            .and_then(|a| a.data.as_ref())
            .map(|data| {
                data.iter()
                    .map(|(name, value)| (name.clone(), form_value(value)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            result_code: response.result_code.clone(),
            psp_reference: response.psp_reference.clone(),
            refusal_reason: response.refusal_reason.clone(),
            form_method: action.and_then(|a| a.method.clone()),
            form_url: action.and_then(|a| a.url.clone()),
            payment_method: action.and_then(|a| a.payment_method_type.clone()),
            payment_data: action
                .and_then(|a| a.payment_data.clone())
                .or_else(|| response.payment_data.clone()),
            result_keys,
            form_parameter,
            merchant_account: merchant_account.map(str::to_string),
        }
    }

    /// Builds the billing engine's view of this response.
    ///
    /// Without a result code the outcome is `Error` and the result code,
    /// reason and psp reference stay empty, whatever else is populated.
    pub fn to_purchase_result(&self) -> PurchaseResult {
        let mut purchase = PurchaseResult {
            form_url: self.form_url.clone(),
            form_method: self.form_method.clone(),
            form_parameter: self.form_parameter.clone(),
            ..PurchaseResult::default()
        };

        match &self.result_code {
            Some(result_code) => {
                purchase.result = Some(PaymentServiceProviderResult::from_result_code(
                    result_code,
                ));
                purchase.result_code = Some(result_code.clone());
                purchase.reason = self.refusal_reason.clone();
                purchase.psp_reference = self.psp_reference.clone();
            }
            None => purchase.result = Some(PaymentServiceProviderResult::Error),
        }

        let data = &mut purchase.additional_data;
        insert_opt(data, FORM_METHOD, &self.form_method);
        insert_opt(data, FORM_URL, &self.form_url);
        insert_opt(data, PAYMENT_METHOD, &self.payment_method);
        insert_opt(data, PAYMENT_DATA, &self.payment_data);
        insert_opt(data, MERCHANT_ACCOUNT_CODE, &self.merchant_account);

        if !self.result_keys.is_empty() {
            data.insert(RESULT_KEYS.to_string(), to_json_object(&self.result_keys));
        }
        if !self.form_parameter.is_empty() {
            data.insert(
                FORM_PARAMETER.to_string(),
                to_json_object(self.form_parameter.iter().map(|(k, v)| (k, v))),
            );
        }

        purchase
    }
}

/// Translates a raw checkout response in one step.
pub fn to_purchase_result(
    response: &PaymentsResponse,
    merchant_account: Option<&str>,
) -> PurchaseResult {
    CheckoutPaymentsResult::from_response(response, merchant_account).to_purchase_result()
}

fn insert_opt(data: &mut BTreeMap<String, String>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        data.insert(key.to_string(), value.clone());
    }
}

fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_json_object<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let object: serde_json::Map<String, Value> = entries
        .into_iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    Value::Object(object).to_string()
}
