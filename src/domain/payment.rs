use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the billing platform knows about one authorization attempt.
///
/// Built once per attempt by the caller and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentData {
    amount: Decimal,
    currency: String,
    payment_transaction_external_key: String,
    payment_info: PaymentInfo,
}

impl PaymentData {
    pub fn new(
        amount: Decimal,
        currency: impl Into<String>,
        payment_transaction_external_key: impl Into<String>,
        payment_info: PaymentInfo,
    ) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(CheckoutError::InvalidRequest(
                "Amount must be positive".to_string(),
            ));
        }
        Ok(Self {
            amount,
            currency: currency.into(),
            payment_transaction_external_key: payment_transaction_external_key.into(),
            payment_info,
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn payment_transaction_external_key(&self) -> &str {
        &self.payment_transaction_external_key
    }

    pub fn payment_info(&self) -> &PaymentInfo {
        &self.payment_info
    }

    /// The amount expressed in minor units of the payment currency.
    pub fn minor_units(&self) -> Result<i64> {
        to_minor_units(self.amount, &self.currency)
    }
}

/// Payment-method specific part of [`PaymentData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub country_code: String,
    pub return_url: Option<String>,
    /// Continuation token returned by a previous redirect step.
    pub payment_data: Option<String>,
    /// Shopper-supplied values answering the previous step's result keys.
    #[serde(default)]
    pub details: BTreeMap<String, String>,
    pub method: PaymentMethodInfo,
}

impl PaymentInfo {
    pub fn new(country_code: impl Into<String>, method: PaymentMethodInfo) -> Self {
        Self {
            country_code: country_code.into(),
            return_url: None,
            payment_data: None,
            details: BTreeMap::new(),
            method,
        }
    }

    pub fn with_return_url(mut self, return_url: impl Into<String>) -> Self {
        self.return_url = Some(return_url.into());
        self
    }

    pub fn with_continuation(
        mut self,
        payment_data: impl Into<String>,
        details: BTreeMap<String, String>,
    ) -> Self {
        self.payment_data = Some(payment_data.into());
        self.details = details;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaymentMethodInfo {
    Klarna(KlarnaInfo),
    /// Any other redirect-based method, named by its gateway type.
    Redirect { payment_method_type: String },
}

impl PaymentMethodInfo {
    pub fn payment_method_type(&self) -> &str {
        match self {
            Self::Klarna(_) => "klarna",
            Self::Redirect {
                payment_method_type,
            } => payment_method_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KlarnaInfo {
    pub line_items: Vec<KlarnaLineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlarnaLineItem {
    pub id: String,
    pub description: String,
    pub quantity: u32,
    pub amount_including_tax: Decimal,
    pub tax_percentage: Option<Decimal>,
}

/// Shopper details forwarded to the gateway.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserData {
    pub shopper_reference: Option<String>,
    pub shopper_email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub shopper_locale: Option<String>,
    pub shopper_ip: Option<String>,
    pub date_of_birth: Option<String>,
}

/// Number of decimal places the gateway expects for `currency`.
pub fn currency_exponent(currency: &str) -> u32 {
    match currency {
        "CVE" | "IDR" | "ISK" | "JPY" | "KRW" | "VND" | "XAF" | "XOF" | "XPF" | "CLP"
        | "PYG" | "UGX" => 0,
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        _ => 2,
    }
}

/// Converts a major-unit amount into gateway minor units.
///
/// Amounts carrying more precision than the currency allows are rejected
/// rather than rounded.
pub fn to_minor_units(amount: Decimal, currency: &str) -> Result<i64> {
    let out_of_range = || CheckoutError::InvalidRequest(format!("Amount {amount} is out of range"));
    let scaled = amount
        .checked_mul(Decimal::from(10_i64.pow(currency_exponent(currency))))
        .ok_or_else(out_of_range)?;
    if scaled.fract() != Decimal::ZERO {
        return Err(CheckoutError::InvalidRequest(format!(
            "Amount {amount} has more precision than {currency} allows"
        )));
    }
    scaled.to_i64().ok_or_else(out_of_range)
}
