use crate::app::operations::fetch_subscription::SubscriptionOperation;
use crate::core::parameters::{text_parameters, value_parameters, ParameterBag, Parameters};
use crate::core::request::{objects, Operation};
use crate::core::response::Response;
use crate::domain::model::identified;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::validate_either;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Invoice filter accepted by `fetchInvoiceNumbers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceState {
    Open,
    Due,
    Paid,
    Overdue,
    WrittenOff,
}

impl InvoiceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceState::Open => "Open",
            InvoiceState::Due => "Due",
            InvoiceState::Paid => "Paid",
            InvoiceState::Overdue => "Overdue",
            InvoiceState::WrittenOff => "WrittenOff",
        }
    }
}

impl fmt::Display for InvoiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceState {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Open" => Ok(InvoiceState::Open),
            "Due" => Ok(InvoiceState::Due),
            "Paid" => Ok(InvoiceState::Paid),
            "Overdue" => Ok(InvoiceState::Overdue),
            "WrittenOff" => Ok(InvoiceState::WrittenOff),
            other => Err(GatewayError::invalid_request(format!(
                "The invoiceState parameter is invalid: {}",
                other
            ))),
        }
    }
}

/// List a subscription's invoice numbers, or fetch one invoice when
/// `invoiceId` is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSubscriptionInvoiceRequest {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    invoice_id: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    invoice_state: Option<InvoiceState>,
}

impl Parameters for FetchSubscriptionInvoiceRequest {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl FetchSubscriptionInvoiceRequest {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        subscription_id => set_subscription_id;
        subscription_reference => set_subscription_reference;
    }

    value_parameters! {
        /// Only applies when listing invoice numbers.
        invoice_state => set_invoice_state: InvoiceState;
    }

    /// The invoice to fetch. Only the first listed id is sent.
    pub fn invoice_id(&self) -> Option<&str> {
        self.invoice_id.first().map(String::as_str)
    }

    pub fn invoice_ids(&self) -> &[String] {
        &self.invoice_id
    }

    pub fn set_invoice_id(&mut self, invoice_id: impl Into<String>) -> &mut Self {
        self.invoice_id = vec![invoice_id.into()];
        self
    }

    pub fn set_invoice_ids(&mut self, invoice_ids: Vec<String>) -> &mut Self {
        self.invoice_id = invoice_ids;
        self
    }

    fn autobill(&self) -> Value {
        identified(
            "merchantAutoBillId",
            self.subscription_id(),
            self.subscription_reference(),
        )
    }
}

impl SubscriptionOperation for FetchSubscriptionInvoiceRequest {}

impl Operation for FetchSubscriptionInvoiceRequest {
    fn object(&self) -> &'static str {
        objects::AUTOBILL
    }

    fn action(&self) -> &'static str {
        if self.invoice_id.is_empty() {
            "fetchInvoiceNumbers"
        } else {
            "fetchInvoice"
        }
    }

    fn validate(&self) -> Result<()> {
        validate_either(
            "subscriptionId",
            self.subscription_id(),
            "subscriptionReference",
            self.subscription_reference(),
        )
    }

    fn build_payload(&self) -> Result<Map<String, Value>> {
        let mut payload = Map::new();
        payload.insert("autobill".to_string(), self.autobill());

        match self.invoice_id() {
            None => {
                let state = self.invoice_state.map(|state| state.as_str());
                payload.insert("invoicestate".to_string(), Value::from(state));
            }
            Some(invoice_id) => {
                payload.insert("invoiceId".to_string(), json!(invoice_id));
                payload.insert("asPDF".to_string(), json!(false));
                payload.insert("statementTemplateId".to_string(), Value::Null);
                payload.insert("dunningIndex".to_string(), json!(0));
                payload.insert("language".to_string(), json!("en-US"));
            }
        }
        Ok(payload)
    }
}

impl Response<FetchSubscriptionInvoiceRequest> {
    /// Invoice numbers from a `fetchInvoiceNumbers` reply. The provider sends a
    /// bare string when there is exactly one.
    pub fn invoice_numbers(&self) -> Vec<&str> {
        match self.field("invoicenum") {
            Some(Value::Array(numbers)) => numbers.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(number)) => vec![number.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn invoice_number(&self) -> Option<&str> {
        self.invoice_numbers().into_iter().next()
    }

    /// Invoice document from a `fetchInvoice` reply.
    pub fn invoice(&self) -> Option<&str> {
        self.str_field("invoice")
    }
}
