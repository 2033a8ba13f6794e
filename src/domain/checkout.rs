//! Wire schema of the hosted checkout API.
//!
//! Only the fields this adapter reads or writes are modelled; anything else the
//! gateway sends is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub currency: String,
    /// Amount in minor units of `currency`.
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopperName {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub description: String,
    pub quantity: u32,
    pub amount_including_tax: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_percentage: Option<i64>,
}

/// Body of `POST /payments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsRequest {
    pub merchant_account: String,
    pub amount: Amount,
    pub reference: String,
    pub payment_method: PaymentMethod,
    pub return_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_name: Option<ShopperName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_locale: Option<String>,
    #[serde(rename = "shopperIP", skip_serializing_if = "Option::is_none")]
    pub shopper_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,
}

/// Body of `POST /payments/details`, used to resume a redirect flow.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsDetailsRequest {
    pub payment_data: String,
    pub details: BTreeMap<String, String>,
}

/// A form field the shopper must supply to continue the flow.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputDetail {
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Option<String>,
}

/// Continuation instructions for a shopper-facing step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutAction {
    #[serde(rename = "type")]
    pub r#type: Option<String>,
    pub method: Option<String>,
    pub url: Option<String>,
    pub payment_data: Option<String>,
    pub payment_method_type: Option<String>,
    /// Form fields to post along with the redirect, in gateway order.
    pub data: Option<Map<String, Value>>,
}

/// Reply of both `/payments` and `/payments/details`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsResponse {
    pub result_code: Option<String>,
    pub psp_reference: Option<String>,
    pub merchant_reference: Option<String>,
    pub refusal_reason: Option<String>,
    pub refusal_reason_code: Option<String>,
    pub payment_data: Option<String>,
    pub details: Option<Vec<InputDetail>>,
    pub action: Option<CheckoutAction>,
}

/// Error body returned alongside a non-2xx status.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub status: Option<u16>,
    pub error_code: Option<String>,
    pub message: Option<String>,
    pub error_type: Option<String>,
    pub psp_reference: Option<String>,
}
