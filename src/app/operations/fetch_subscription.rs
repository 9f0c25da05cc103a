use crate::core::parameters::{text_parameters, ParameterBag, Parameters};
use crate::core::request::{objects, Operation};
use crate::core::response::Response;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{non_blank, validate_either};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Operations whose reply carries an `autobill` object.
pub trait SubscriptionOperation: Operation {}

impl<R: SubscriptionOperation> Response<R> {
    /// Provider status, e.g. `Active`, `Pending Cancel`, `Stopped`.
    pub fn subscription_status(&self) -> Option<&str> {
        self.str_field("autobill.status")
    }

    pub fn billing_state(&self) -> Option<&str> {
        self.str_field("autobill.billingState")
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.str_field("autobill.startTimestamp")?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }

    pub fn product_ids(&self) -> Vec<&str> {
        match self.field("autobill.items") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.pointer("/product/merchantProductId"))
                .filter_map(Value::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Fetch one subscription by `subscriptionId` or `subscriptionReference`.
///
/// When both are given the provider reference is used for the lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSubscriptionRequest {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_reference: Option<String>,
}

impl Parameters for FetchSubscriptionRequest {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl FetchSubscriptionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        subscription_id => set_subscription_id;
        subscription_reference => set_subscription_reference;
    }
}

impl SubscriptionOperation for FetchSubscriptionRequest {}

impl Operation for FetchSubscriptionRequest {
    fn object(&self) -> &'static str {
        objects::AUTOBILL
    }

    fn action(&self) -> &'static str {
        if non_blank(self.subscription_reference()).is_some() {
            "fetchByVid"
        } else {
            "fetchByMerchantAutoBillId"
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
        match non_blank(self.subscription_reference()) {
            Some(reference) => {
                payload.insert("vid".to_string(), json!(reference));
            }
            None => {
                payload.insert(
                    "merchantAutoBillId".to_string(),
                    Value::from(non_blank(self.subscription_id())),
                );
            }
        }
        payload.insert("includeChildren".to_string(), json!(false));
        Ok(payload)
    }

    fn build_response(self, reply: Value) -> Result<Response<Self>> {
        let response = Response::new(self, reply);
        if response.is_successful()
            && response.subscription_id().is_none()
            && response.subscription_reference().is_none()
        {
            return Err(GatewayError::invalid_response(
                "Subscription reply carries neither merchantAutoBillId nor VID.",
            ));
        }
        Ok(response)
    }
}
