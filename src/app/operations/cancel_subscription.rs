use crate::app::operations::fetch_subscription::SubscriptionOperation;
use crate::core::parameters::{text_parameters, value_parameters, ParameterBag, Parameters};
use crate::core::request::{objects, Operation};
use crate::domain::model::identified;
use crate::utils::error::Result;
use crate::utils::validation::validate_either;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Stop a subscription's future billing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSubscriptionRequest {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disentitle: Option<bool>,
}

impl Parameters for CancelSubscriptionRequest {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl CancelSubscriptionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        subscription_id => set_subscription_id;
        subscription_reference => set_subscription_reference;
        /// Provider cancel reason code.
        cancel_reason => set_cancel_reason;
    }

    value_parameters! {
        /// Revoke entitlements now instead of at the end of the paid period.
        disentitle => set_disentitle: bool;
    }
}

impl SubscriptionOperation for CancelSubscriptionRequest {}

impl Operation for CancelSubscriptionRequest {
    fn object(&self) -> &'static str {
        objects::AUTOBILL
    }

    fn action(&self) -> &'static str {
        "cancel"
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
        payload.insert(
            "autobill".to_string(),
            identified(
                "merchantAutoBillId",
                self.subscription_id(),
                self.subscription_reference(),
            ),
        );
        payload.insert("disentitle".to_string(), json!(self.disentitle.unwrap_or(false)));
        payload.insert("force".to_string(), json!(true));
        payload.insert("settle".to_string(), json!(true));
        payload.insert("sendCancellationNotice".to_string(), json!(true));
        payload.insert("cancelReasonCode".to_string(), Value::from(self.cancel_reason()));
        Ok(payload)
    }
}
