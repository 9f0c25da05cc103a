use crate::core::parameters::{text_parameters, ParameterBag, Parameters};
use crate::core::request::{objects, Operation};
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Create or update a customer account keyed by `customerId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl Parameters for CreateCustomerRequest {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl CreateCustomerRequest {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        customer_id => set_customer_id;
        customer_reference => set_customer_reference;
        name => set_name;
        email => set_email;
    }
}

impl Operation for CreateCustomerRequest {
    fn object(&self) -> &'static str {
        objects::ACCOUNT
    }

    fn action(&self) -> &'static str {
        "update"
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["customerId"]
    }

    fn validate(&self) -> Result<()> {
        match self.email() {
            Some(email) if !email.contains('@') => Err(GatewayError::invalid_request(
                "The email parameter is invalid.",
            )),
            _ => Ok(()),
        }
    }

    fn build_payload(&self) -> Result<Map<String, Value>> {
        let mut account = Map::new();
        account.insert("merchantAccountId".to_string(), Value::from(self.customer_id()));
        account.insert("VID".to_string(), Value::from(self.customer_reference()));
        if let Some(name) = self.name() {
            account.insert("name".to_string(), json!(name));
        }
        if let Some(email) = self.email() {
            account.insert("emailAddress".to_string(), json!(email));
        }

        let mut payload = Map::new();
        payload.insert("account".to_string(), Value::Object(account));
        Ok(payload)
    }
}
