use crate::app::operations::fetch_subscription::SubscriptionOperation;
use crate::core::parameters::{text_parameters, value_parameters, ParameterBag, Parameters};
use crate::core::request::{objects, Operation};
use crate::domain::model::{identified, Product};
use crate::utils::error::Result;
use crate::utils::validation::{validate_either, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Create (or update) a subscription for an existing customer.
///
/// The product is given either as a full [`Product`] or by
/// `productId`/`productReference`. The plan is optional and falls back to the
/// product's default plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product: Option<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<DateTime<Utc>>,
}

impl Parameters for CreateSubscriptionRequest {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl CreateSubscriptionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        subscription_id => set_subscription_id;
        subscription_reference => set_subscription_reference;
        customer_id => set_customer_id;
        customer_reference => set_customer_reference;
        product_id => set_product_id;
        product_reference => set_product_reference;
        plan_id => set_plan_id;
        plan_reference => set_plan_reference;
        payment_method_id => set_payment_method_id;
        payment_method_reference => set_payment_method_reference;
        currency => set_currency;
    }

    value_parameters! {
        /// First billing time; the provider starts immediately when unset.
        start_time => set_start_time: DateTime<Utc>;
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn set_product(&mut self, product: Product) -> &mut Self {
        self.product = Some(product);
        self
    }
}

impl SubscriptionOperation for CreateSubscriptionRequest {}

impl Operation for CreateSubscriptionRequest {
    fn object(&self) -> &'static str {
        objects::AUTOBILL
    }

    fn action(&self) -> &'static str {
        "update"
    }

    fn required_parameters(&self) -> &'static [&'static str] {
        &["subscriptionId", "currency"]
    }

    fn validate(&self) -> Result<()> {
        validate_either(
            "customerId",
            self.customer_id(),
            "customerReference",
            self.customer_reference(),
        )?;
        match &self.product {
            Some(product) => product.validate()?,
            None => validate_either(
                "productId",
                self.product_id(),
                "productReference",
                self.product_reference(),
            )?,
        }
        validate_either(
            "paymentMethodId",
            self.payment_method_id(),
            "paymentMethodReference",
            self.payment_method_reference(),
        )
    }

    fn build_payload(&self) -> Result<Map<String, Value>> {
        let product = match &self.product {
            Some(product) => product.to_payload(),
            None => identified(
                "merchantProductId",
                self.product_id(),
                self.product_reference(),
            ),
        };

        let mut autobill = Map::new();
        autobill.insert("merchantAutoBillId".to_string(), Value::from(self.subscription_id()));
        autobill.insert("VID".to_string(), Value::from(self.subscription_reference()));
        autobill.insert("currency".to_string(), Value::from(self.currency()));
        autobill.insert(
            "account".to_string(),
            identified("merchantAccountId", self.customer_id(), self.customer_reference()),
        );
        autobill.insert(
            "items".to_string(),
            json!([{ "index": 0, "product": product }]),
        );
        if self.plan_id.is_some() || self.plan_reference.is_some() {
            autobill.insert(
                "billingPlan".to_string(),
                identified("merchantBillingPlanId", self.plan_id(), self.plan_reference()),
            );
        }
        autobill.insert(
            "paymentMethod".to_string(),
            identified(
                "merchantPaymentMethodId",
                self.payment_method_id(),
                self.payment_method_reference(),
            ),
        );
        if let Some(start) = self.start_time {
            autobill.insert("startTimestamp".to_string(), json!(start.to_rfc3339()));
        }

        let mut payload = Map::new();
        payload.insert("autobill".to_string(), Value::Object(autobill));
        payload.insert("validatePaymentMethod".to_string(), json!(true));
        payload.insert("minChargebackProbability".to_string(), json!(100));
        payload.insert("ignoreAvsPolicy".to_string(), json!(false));
        payload.insert("ignoreCvnPolicy".to_string(), json!(false));
        payload.insert("campaignCode".to_string(), Value::Null);
        payload.insert("dryrun".to_string(), json!(false));
        payload.insert("cancelReferenceOnFailure".to_string(), json!(true));
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Plan;
    use chrono::TimeZone;

    fn subscription() -> CreateSubscriptionRequest {
        let mut request = CreateSubscriptionRequest::new();
        request
            .set_subscription_id("sub-1")
            .set_currency("USD")
            .set_customer_id("cust-1")
            .set_product_id("prod-1")
            .set_payment_method_id("pm-1");
        request
    }

    #[test]
    fn test_required_and_either_or_parameters() {
        let mut request = CreateSubscriptionRequest::new();
        request.set_subscription_id("sub-1");
        assert_eq!(
            request.get_data().unwrap_err().message(),
            "The currency parameter is required"
        );

        request.set_currency("USD").set_customer_id("cust-1");
        assert_eq!(
            request.get_data().unwrap_err().message(),
            "Either the productId or productReference parameter is required."
        );

        request.set_product_reference("VID-prod-1");
        assert_eq!(
            request.get_data().unwrap_err().message(),
            "Either the paymentMethodId or paymentMethodReference parameter is required."
        );

        request.set_payment_method_reference("VID-pm-1");
        assert!(request.get_data().is_ok());
    }

    #[test]
    fn test_embedded_product_is_validated() {
        let mut request = subscription();
        request.set_product(Product::new());
        let err = request.get_data().unwrap_err();
        assert_eq!(err.message(), "Product requires id or reference.");
    }

    #[test]
    fn test_payload_with_product_object_and_start_time() {
        let mut plan = Plan::new();
        plan.set_id("monthly");
        let mut product = Product::new();
        product.set_id("prod-9").set_plan(plan);

        let mut request = subscription();
        request
            .set_product(product)
            .set_plan_reference("VID-plan")
            .set_start_time(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());

        let data = request.get_data().unwrap();
        let autobill = &data["autobill"];
        assert_eq!(data["action"], "update");
        assert_eq!(autobill["merchantAutoBillId"], "sub-1");
        assert_eq!(autobill["items"][0]["product"]["merchantProductId"], "prod-9");
        assert_eq!(
            autobill["items"][0]["product"]["defaultBillingPlan"]["merchantBillingPlanId"],
            "monthly"
        );
        assert_eq!(autobill["billingPlan"]["VID"], "VID-plan");
        assert_eq!(autobill["startTimestamp"], "2024-05-01T00:00:00+00:00");
        assert_eq!(data["validatePaymentMethod"], true);
    }

    #[test]
    fn test_start_time_round_trips_through_parameters() {
        let mut request = subscription();
        request.set_start_time(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());

        let rebuilt = CreateSubscriptionRequest::from_parameters(request.parameters()).unwrap();
        assert_eq!(rebuilt.start_time(), request.start_time());
        assert!(rebuilt.parameters().contains("startTime"));
    }
}
