use crate::domain::checkout::{
    Amount, LineItem, PaymentMethod, PaymentsDetailsRequest, PaymentsRequest, ShopperName,
};
use crate::domain::payment::{PaymentData, PaymentMethodInfo, UserData, to_minor_units};
use crate::domain::ports::RequestFactory;
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Maps billing payment data onto checkout requests.
#[derive(Debug, Clone, Default)]
pub struct DefaultRequestFactory {
    default_return_url: Option<String>,
}

impl DefaultRequestFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return URL used when the payment info does not carry one.
    pub fn with_default_return_url(mut self, return_url: impl Into<String>) -> Self {
        self.default_return_url = Some(return_url.into());
        self
    }
}

impl RequestFactory for DefaultRequestFactory {
    fn create_payment(
        &self,
        merchant_account: &str,
        payment_data: &PaymentData,
        user_data: &UserData,
    ) -> Result<PaymentsRequest> {
        let info = payment_data.payment_info();
        let return_url = info
            .return_url
            .clone()
            .or_else(|| self.default_return_url.clone())
            .ok_or_else(|| CheckoutError::InvalidRequest("Missing return URL".to_string()))?;

        let line_items = match &info.method {
            PaymentMethodInfo::Klarna(klarna) => klarna
                .line_items
                .iter()
                .map(|item| -> Result<LineItem> {
                    Ok(LineItem {
                        id: item.id.clone(),
                        description: item.description.clone(),
                        quantity: item.quantity,
                        amount_including_tax: to_minor_units(
                            item.amount_including_tax,
                            payment_data.currency(),
                        )?,
                        tax_percentage: item.tax_percentage.map(basis_points).transpose()?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            PaymentMethodInfo::Redirect { .. } => Vec::new(),
        };

        let shopper_name = match (&user_data.first_name, &user_data.last_name) {
            (None, None) => None,
            (first_name, last_name) => Some(ShopperName {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
            }),
        };

        Ok(PaymentsRequest {
            merchant_account: merchant_account.to_string(),
            amount: Amount {
                currency: payment_data.currency().to_string(),
                value: payment_data.minor_units()?,
            },
            reference: payment_data.payment_transaction_external_key().to_string(),
            payment_method: PaymentMethod {
                r#type: info.method.payment_method_type().to_string(),
            },
            return_url,
            country_code: Some(info.country_code.clone()),
            shopper_reference: user_data.shopper_reference.clone(),
            shopper_email: user_data.shopper_email.clone(),
            shopper_name,
            shopper_locale: user_data.shopper_locale.clone(),
            shopper_ip: user_data.shopper_ip.clone(),
            date_of_birth: user_data.date_of_birth.clone(),
            line_items,
        })
    }

    fn complete_payment(
        &self,
        _merchant_account: &str,
        payment_data: &PaymentData,
        _user_data: &UserData,
    ) -> Result<PaymentsDetailsRequest> {
        let info = payment_data.payment_info();
        let token = info.payment_data.clone().ok_or_else(|| {
            CheckoutError::InvalidRequest("Missing payment data continuation token".to_string())
        })?;

        Ok(PaymentsDetailsRequest {
            payment_data: token,
            details: info.details.clone(),
        })
    }
}

/// Tax percentage in basis points, e.g. 19% becomes 1900.
fn basis_points(percentage: Decimal) -> Result<i64> {
    let invalid =
        || CheckoutError::InvalidRequest(format!("Invalid tax percentage {percentage}"));
    percentage
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(invalid)?
        .round()
        .to_i64()
        .ok_or_else(invalid)
}
