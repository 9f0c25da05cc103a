use crate::core::parameters::{
    count_parameters, decimal_parameters, text_parameters, value_parameters, Count, Decimal,
    ParameterBag, Parameters,
};
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One purchased line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<Count>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_classification: Option<String>,
}

impl Parameters for Item {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        sku => set_sku;
        name => set_name;
        description => set_description;
        tax_classification => set_tax_classification;
    }

    decimal_parameters! {
        /// Unit price.
        price => set_price;
    }

    count_parameters! {
        quantity => set_quantity;
    }

    pub(crate) fn to_payload(&self, index: usize) -> Value {
        json!({
            "index": index,
            "sku": self.sku,
            "name": self.name,
            "description": self.description,
            "price": self.price(),
            "quantity": self.quantity().unwrap_or(1),
            "taxClassification": self.tax_classification,
        })
    }
}

impl Validate for Item {
    fn validate(&self) -> Result<()> {
        if self.sku.is_none() {
            return Err(GatewayError::invalid_item("Item requires sku."));
        }
        if self.price.is_none() {
            return Err(GatewayError::invalid_item("Item requires price."));
        }
        if self.quantity() == Some(0) {
            return Err(GatewayError::invalid_item("Item quantity must be at least 1."));
        }
        Ok(())
    }
}

/// One line of a partial refund, addressed by sku or by its index in the
/// original transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundItem {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_item_index_number: Option<Count>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_only: Option<bool>,
}

impl Parameters for RefundItem {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl RefundItem {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        sku => set_sku;
    }

    decimal_parameters! {
        amount => set_amount;
    }

    count_parameters! {
        transaction_item_index_number => set_transaction_item_index_number;
    }

    value_parameters! {
        /// A tax-only line adjusts tax and carries no amount of its own.
        tax_only => set_tax_only: bool;
    }

    pub(crate) fn to_payload(&self) -> Value {
        let mut map = Map::new();
        if let Some(sku) = &self.sku {
            map.insert("sku".to_string(), json!(sku));
        }
        if let Some(index) = self.transaction_item_index_number() {
            map.insert("transactionItemIndexNumber".to_string(), json!(index));
        }
        map.insert("amount".to_string(), Value::from(self.amount()));
        map.insert("taxOnly".to_string(), json!(self.tax_only.unwrap_or(false)));
        Value::Object(map)
    }
}

impl Validate for RefundItem {
    fn validate(&self) -> Result<()> {
        if self.amount.is_none() && !self.tax_only.unwrap_or(false) {
            return Err(GatewayError::invalid_item(
                "Refund item requires amount if taxOnly is not set to true.",
            ));
        }
        if self.sku.is_none() && self.transaction_item_index_number.is_none() {
            return Err(GatewayError::invalid_item(
                "Refund item requires sku or transactionItemIndexNumber.",
            ));
        }
        Ok(())
    }
}
