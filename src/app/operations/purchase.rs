use crate::core::parameters::{decimal_parameters, text_parameters, Decimal, ParameterBag, Parameters};
use crate::core::request::{objects, Operation};
use crate::domain::items::Item;
use crate::domain::model::{identified, Customer};
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{validate_either, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethodType {
    CreditCard,
    PayPal,
}

impl PaymentMethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "CreditCard",
            Self::PayPal => "PayPal",
        }
    }
}

/// Authorize and capture a one-off charge.
///
/// Requires `amount` and `currency`, plus either `customerId` or
/// `customerReference`: the provider only charges existing customers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer: Option<Customer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    items: Vec<Item>,
}

impl Parameters for PurchaseRequest {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl PurchaseRequest {
    pub fn new() -> Self {
        Self::default()
    }

    decimal_parameters! {
        /// Decimal amount, e.g. `"9.99"`.
        amount => set_amount;
    }

    text_parameters! {
        currency => set_currency;
        transaction_id => set_transaction_id;
        customer_id => set_customer_id;
        customer_reference => set_customer_reference;
        payment_method_id => set_payment_method_id;
        payment_method_reference => set_payment_method_reference;
        description => set_description;
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Customer) -> &mut Self {
        self.customer = Some(customer);
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<Item>) -> &mut Self {
        self.items = items;
        self
    }

    pub fn add_item(&mut self, item: Item) -> &mut Self {
        self.items.push(item);
        self
    }

    pub(crate) fn validate_purchase(&self) -> Result<()> {
        validate_amount(self.amount())?;
        validate_either(
            "customerId",
            self.customer_id(),
            "customerReference",
            self.customer_reference(),
        )?;
        if let Some(customer) = &self.customer {
            customer.validate()?;
        }
        self.items.iter().try_for_each(Validate::validate)
    }

    /// Transaction body shared by card and PayPal purchases.
    pub(crate) fn transaction_payload(
        &self,
        method_type: PaymentMethodType,
        method_extra: Option<(&str, Value)>,
    ) -> Map<String, Value> {
        let mut account = identified(
            "merchantAccountId",
            self.customer_id(),
            self.customer_reference(),
        );
        if let (Value::Object(map), Some(customer)) = (&mut account, &self.customer) {
            map.extend(customer.to_payload());
        }

        let mut payment_method = identified(
            "merchantPaymentMethodId",
            self.payment_method_id(),
            self.payment_method_reference(),
        );
        if let Value::Object(map) = &mut payment_method {
            map.insert("type".to_string(), json!(method_type.as_str()));
            if let Some((key, value)) = method_extra {
                map.insert(key.to_string(), value);
            }
        }

        let mut transaction = Map::new();
        transaction.insert("merchantTransactionId".to_string(), Value::from(self.transaction_id()));
        transaction.insert("amount".to_string(), Value::from(self.amount()));
        transaction.insert("currency".to_string(), Value::from(self.currency()));
        transaction.insert("account".to_string(), account);
        transaction.insert("sourcePaymentMethod".to_string(), payment_method);
        if let Some(description) = &self.description {
            transaction.insert("description".to_string(), json!(description));
        }
        if !self.items.is_empty() {
            let items: Vec<Value> = self
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| item.to_payload(index))
                .collect();
            transaction.insert("transactionItems".to_string(), Value::Array(items));
        }

        let mut payload = Map::new();
        payload.insert("transaction".to_string(), Value::Object(transaction));
        payload.insert("sendEmailNotification".to_string(), json!(false));
        payload.insert("ignoreAvsPolicy".to_string(), json!(false));
        payload.insert("ignoreCvnPolicy".to_string(), json!(false));
        payload.insert("campaignCode".to_string(), Value::Null);
        payload.insert("dryrun".to_string(), json!(false));
        payload
    }
}

/// Amounts must be plain non-negative decimals with at most two fractional
/// digits. Exponents, signs and surrounding whitespace are rejected.
pub(crate) fn validate_amount(amount: Option<&str>) -> Result<()> {
    let Some(value) = amount else {
        return Ok(());
    };
    let re = Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$")
        .map_err(|e| GatewayError::invalid_request(format!("Amount pattern error: {}", e)))?;
    if re.is_match(value) {
        Ok(())
    } else {
        Err(GatewayError::invalid_request(format!(
            "The amount parameter is invalid: {}",
            value
        )))
    }
}

impl Operation for PurchaseRequest {
    fn object(&self) -> &'static str {
        objects::TRANSACTION
    }

    fn action(&self) -> &'static str {
        "authCapture"
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["amount", "currency"]
    }

    fn validate(&self) -> Result<()> {
        self.validate_purchase()
    }

    fn build_payload(&self) -> Result<Map<String, Value>> {
        Ok(self.transaction_payload(PaymentMethodType::CreditCard, None))
    }
}
