use crate::core::parameters::{text_parameters, value_parameters, ParameterBag, Parameters};
use crate::core::request::{objects, Operation};
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::non_blank;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Finish a PayPal purchase once the customer is back from PayPal.
///
/// `payPalTransactionReference` is the provider reference handed back on the
/// return URL; `success` is false when the customer came back through the
/// cancel URL. The reply names the same transaction as the original purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePayPalPurchaseRequest {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pay_pal_transaction_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
}

impl Parameters for CompletePayPalPurchaseRequest {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl CompletePayPalPurchaseRequest {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        pay_pal_transaction_reference => set_pay_pal_transaction_reference;
    }

    value_parameters! {
        success => set_success: bool;
    }
}

impl Operation for CompletePayPalPurchaseRequest {
    fn object(&self) -> &'static str {
        objects::TRANSACTION
    }

    fn action(&self) -> &'static str {
        "finalizePayPalAuth"
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["payPalTransactionReference", "success"]
    }

    fn validate(&self) -> Result<()> {
        if non_blank(self.pay_pal_transaction_reference()).is_none() {
            return Err(GatewayError::invalid_request(
                "The payPalTransactionReference parameter is required",
            ));
        }
        Ok(())
    }

    fn build_payload(&self) -> Result<Map<String, Value>> {
        let mut payload = Map::new();
        payload.insert(
            "payPalTransactionId".to_string(),
            Value::from(self.pay_pal_transaction_reference()),
        );
        payload.insert("success".to_string(), json!(self.success.unwrap_or(false)));
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::response::Response;

    fn completion() -> CompletePayPalPurchaseRequest {
        let mut request = CompletePayPalPurchaseRequest::new();
        request
            .set_pay_pal_transaction_reference("VID-t-42")
            .set_success(true);
        request
    }

    #[test]
    fn test_required_parameters() {
        let mut request = CompletePayPalPurchaseRequest::new();
        assert_eq!(
            request.get_data().unwrap_err().message(),
            "The payPalTransactionReference parameter is required"
        );

        request.set_pay_pal_transaction_reference("VID-t-42");
        assert_eq!(
            request.get_data().unwrap_err().message(),
            "The success parameter is required"
        );

        request.set_success(false);
        assert!(request.get_data().is_ok());
    }

    #[test]
    fn test_blank_reference_is_rejected() {
        let mut request = completion();
        request.set_pay_pal_transaction_reference(" ");
        assert!(request.get_data().unwrap_err().is_validation());
    }

    #[test]
    fn test_payload() {
        assert_eq!(
            completion().get_data().unwrap(),
            json!({
                "action": "finalizePayPalAuth",
                "payPalTransactionId": "VID-t-42",
                "success": true
            })
        );
        assert_eq!(completion().object(), "Transaction");
    }

    #[test]
    fn test_parameters_use_wire_names() {
        let params = ParameterBag::try_from(json!({
            "payPalTransactionReference": "VID-t-42",
            "success": false
        }))
        .unwrap();

        let request = CompletePayPalPurchaseRequest::from_parameters(params.clone()).unwrap();
        assert_eq!(request.pay_pal_transaction_reference(), Some("VID-t-42"));
        assert_eq!(request.success(), Some(false));
        assert_eq!(request.parameters(), params);
    }

    #[test]
    fn test_response_names_the_purchase_transaction() {
        let response = Response::new(
            completion(),
            json!({
                "return": {"returnCode": "200", "returnString": "OK"},
                "transaction": {"merchantTransactionId": "order-42", "VID": "VID-t-42"}
            }),
        );
        assert!(response.is_successful());
        assert_eq!(response.transaction_id(), Some("order-42"));
        assert_eq!(response.transaction_reference(), Some("VID-t-42"));
    }
}
