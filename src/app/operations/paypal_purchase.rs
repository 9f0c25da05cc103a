use crate::app::operations::purchase::{PaymentMethodType, PurchaseRequest};
use crate::core::parameters::{text_parameters, ParameterBag, Parameters};
use crate::core::request::{objects, Operation};
use crate::core::response::Response;
use crate::utils::error::Result;
use crate::utils::validation::validate_request_url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Begin a PayPal purchase. The reply carries the URL the customer is sent to.
///
/// Takes every purchase parameter plus `returnUrl` and `cancelUrl`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalPurchaseRequest {
    #[serde(flatten)]
    purchase: PurchaseRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_url: Option<String>,
}

impl Parameters for PayPalPurchaseRequest {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        self.purchase.extra_mut()
    }
}

impl PayPalPurchaseRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_purchase(purchase: PurchaseRequest) -> Self {
        Self {
            purchase,
            ..Self::default()
        }
    }

    pub fn purchase(&self) -> &PurchaseRequest {
        &self.purchase
    }

    pub fn purchase_mut(&mut self) -> &mut PurchaseRequest {
        &mut self.purchase
    }

    text_parameters! {
        /// Where PayPal sends the customer after approving the payment.
        return_url => set_return_url;
        /// Where PayPal sends the customer after abandoning the payment.
        cancel_url => set_cancel_url;
    }
}

impl Operation for PayPalPurchaseRequest {
    fn object(&self) -> &'static str {
        objects::TRANSACTION
    }

    fn action(&self) -> &'static str {
        self.purchase.action()
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["returnUrl", "cancelUrl", "amount", "currency"]
    }

    fn validate(&self) -> Result<()> {
        if let Some(url) = self.return_url() {
            validate_request_url("returnUrl", url)?;
        }
        if let Some(url) = self.cancel_url() {
            validate_request_url("cancelUrl", url)?;
        }
        self.purchase.validate_purchase()
    }

    fn build_payload(&self) -> Result<Map<String, Value>> {
        let paypal = json!({
            "returnUrl": self.return_url,
            "cancelUrl": self.cancel_url,
        });
        Ok(self
            .purchase
            .transaction_payload(PaymentMethodType::PayPal, Some(("paypal", paypal))))
    }
}

impl Response<PayPalPurchaseRequest> {
    pub fn redirect_url(&self) -> Option<&str> {
        self.str_field("transaction.sourcePaymentMethod.paypal.redirectUrl")
    }

    pub fn is_redirect(&self) -> bool {
        self.is_successful() && self.redirect_url().is_some()
    }
}
