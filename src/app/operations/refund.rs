use crate::app::operations::purchase::validate_amount;
use crate::core::parameters::{decimal_parameters, text_parameters, Decimal, ParameterBag, Parameters};
use crate::core::request::{objects, Operation};
use crate::core::response::Response;
use crate::domain::items::RefundItem;
use crate::domain::model::identified;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{validate_either, Validate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Refund a captured transaction, in full or in part.
///
/// With neither `amount` nor `items` the whole transaction is refunded. A
/// partial refund is given either as an amount or as item lines, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    items: Vec<RefundItem>,
}

impl Parameters for RefundRequest {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl RefundRequest {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        transaction_id => set_transaction_id;
        transaction_reference => set_transaction_reference;
        currency => set_currency;
        /// Free text stored with the refund.
        note => set_note;
    }

    decimal_parameters! {
        /// Partial refund amount; the whole transaction is refunded when unset.
        amount => set_amount;
    }

    pub fn items(&self) -> &[RefundItem] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<RefundItem>) -> &mut Self {
        self.items = items;
        self
    }

    pub fn add_item(&mut self, item: RefundItem) -> &mut Self {
        self.items.push(item);
        self
    }
}

impl Operation for RefundRequest {
    fn object(&self) -> &'static str {
        objects::REFUND
    }

    fn action(&self) -> &'static str {
        "perform"
    }

    fn validate(&self) -> Result<()> {
        validate_either(
            "transactionId",
            self.transaction_id(),
            "transactionReference",
            self.transaction_reference(),
        )?;
        if self.amount.is_some() && !self.items.is_empty() {
            return Err(GatewayError::invalid_request(
                "The amount and items parameters cannot both be set.",
            ));
        }
        validate_amount(self.amount())?;
        self.items.iter().try_for_each(Validate::validate)
    }

    fn build_payload(&self) -> Result<Map<String, Value>> {
        let mut refund = Map::new();
        refund.insert(
            "transaction".to_string(),
            identified(
                "merchantTransactionId",
                self.transaction_id(),
                self.transaction_reference(),
            ),
        );
        refund.insert("amount".to_string(), Value::from(self.amount()));
        refund.insert("currency".to_string(), Value::from(self.currency()));
        refund.insert("note".to_string(), Value::from(self.note()));
        if !self.items.is_empty() {
            let items: Vec<Value> = self.items.iter().map(RefundItem::to_payload).collect();
            refund.insert("refundItems".to_string(), Value::Array(items));
        }
        refund.insert("tokenAction".to_string(), json!("None"));

        let mut payload = Map::new();
        payload.insert("refunds".to_string(), json!([refund]));
        Ok(payload)
    }
}

impl Response<RefundRequest> {
    /// Provider references of the refunds created, in request order.
    pub fn refund_references(&self) -> Vec<&str> {
        match self.field("refunds") {
            Some(Value::Array(refunds)) => refunds
                .iter()
                .filter_map(|refund| refund.get("VID").and_then(Value::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn refund_reference(&self) -> Option<&str> {
        self.str_field("refunds.0.VID")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refund_item(sku: &str) -> RefundItem {
        let mut item = RefundItem::new();
        item.set_sku(sku).set_amount("1.00");
        item
    }

    #[test]
    fn test_transaction_either_or() {
        let err = RefundRequest::new().get_data().unwrap_err();
        assert_eq!(
            err.message(),
            "Either the transactionId or transactionReference parameter is required."
        );

        let mut request = RefundRequest::new();
        request.set_transaction_reference("VID-t-1");
        assert!(request.get_data().is_ok());
    }

    #[test]
    fn test_full_refund_payload() {
        let mut request = RefundRequest::new();
        request.set_transaction_id("t-1").set_note("duplicate order");

        let data = request.get_data().unwrap();
        assert_eq!(data["action"], "perform");
        let refund = &data["refunds"][0];
        assert_eq!(refund["transaction"]["merchantTransactionId"], "t-1");
        assert_eq!(refund["amount"], Value::Null);
        assert_eq!(refund["note"], "duplicate order");
        assert!(refund.get("refundItems").is_none());
    }

    #[test]
    fn test_amount_and_items_are_exclusive() {
        let mut request = RefundRequest::new();
        request
            .set_transaction_id("t-1")
            .set_amount("2.00")
            .add_item(refund_item("sku-1"));

        let err = request.get_data().unwrap_err();
        assert_eq!(err.message(), "The amount and items parameters cannot both be set.");
    }

    #[test]
    fn test_item_refund_payload() {
        let mut tax = RefundItem::new();
        tax.set_transaction_item_index_number(1).set_tax_only(true);

        let mut request = RefundRequest::new();
        request
            .set_transaction_id("t-1")
            .set_items(vec![refund_item("sku-1"), tax]);

        let data = request.get_data().unwrap();
        let items = &data["refunds"][0]["refundItems"];
        assert_eq!(items[0]["sku"], "sku-1");
        assert_eq!(items[1]["transactionItemIndexNumber"], 1);
        assert_eq!(items[1]["taxOnly"], true);
        assert_eq!(items[1]["amount"], Value::Null);
    }

    #[test]
    fn test_items_initialize_from_parameters() {
        let params = ParameterBag::try_from(json!({
            "transactionId": "t-1",
            "items": [{"sku": "sku-1", "amount": "3.00"}, {"transactionItemIndexNumber": 2, "taxOnly": true}]
        }))
        .unwrap();

        let request = RefundRequest::from_parameters(params.clone()).unwrap();
        assert_eq!(request.items().len(), 2);
        assert_eq!(request.items()[1].transaction_item_index_number(), Some(2));
        assert_eq!(request.parameters(), params);
    }

    #[test]
    fn test_refund_references() {
        let response = Response::new(
            RefundRequest::new(),
            json!({
                "return": {"returnCode": "200"},
                "refunds": [{"VID": "r-1"}, {"VID": "r-2"}]
            }),
        );
        assert_eq!(response.refund_reference(), Some("r-1"));
        assert_eq!(response.refund_references(), vec!["r-1", "r-2"]);

        let empty = Response::new(RefundRequest::new(), json!({}));
        assert!(empty.refund_references().is_empty());
    }
}
