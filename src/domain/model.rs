use crate::core::parameters::{
    count_parameters, decimal_parameters, text_parameters, Count, Decimal, ParameterBag, Parameters,
};
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{non_blank, Validate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// `{<id_key>: id, "VID": reference}`, the provider's way of naming an object
/// by either the merchant's identifier or its own. Blank identifiers are sent
/// as null.
pub(crate) fn identified(id_key: &str, id: Option<&str>, reference: Option<&str>) -> Value {
    let mut map = Map::new();
    map.insert(id_key.to_string(), Value::from(non_blank(id)));
    map.insert("VID".to_string(), Value::from(non_blank(reference)));
    Value::Object(map)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
}

impl Parameters for Price {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl Price {
    pub fn new(amount: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            amount: Some(Decimal::from(amount.into())),
            currency: Some(currency.into()),
            extra: ParameterBag::new(),
        }
    }

    decimal_parameters! {
        amount => set_amount;
    }

    text_parameters! {
        currency => set_currency;
    }

    pub(crate) fn to_payload(&self) -> Value {
        json!({ "amount": self.amount(), "currency": self.currency })
    }
}

impl Validate for Price {
    fn validate(&self) -> Result<()> {
        if self.amount.is_none() {
            return Err(GatewayError::invalid_item("Price requires amount."));
        }
        if self.currency.is_none() {
            return Err(GatewayError::invalid_item("Price requires currency."));
        }
        Ok(())
    }
}

/// Free-form name/value pair the provider stores with an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl Parameters for Attribute {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            extra: ParameterBag::new(),
        }
    }

    text_parameters! {
        name => set_name;
        value => set_value;
    }

    pub(crate) fn to_payload(&self) -> Value {
        json!({ "name": self.name, "value": self.value })
    }
}

impl Validate for Attribute {
    fn validate(&self) -> Result<()> {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(GatewayError::invalid_item("Attribute requires name.")),
        }
    }
}

/// Billing plan: how often and how much a subscription is charged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval_count: Option<Count>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prices: Vec<Price>,
}

impl Parameters for Plan {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        id => set_id;
        reference => set_reference;
        /// Period unit understood by the provider: Day, Week, Month or Year.
        interval => set_interval;
        tax_classification => set_tax_classification;
    }

    count_parameters! {
        interval_count => set_interval_count;
    }

    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    pub fn set_prices(&mut self, prices: Vec<Price>) -> &mut Self {
        self.prices = prices;
        self
    }

    pub(crate) fn to_payload(&self) -> Value {
        let mut plan = identified("merchantBillingPlanId", self.id(), self.reference());
        if let Value::Object(map) = &mut plan {
            if let Some(tax) = &self.tax_classification {
                map.insert("taxClassification".to_string(), json!(tax));
            }
            if let Some(interval) = &self.interval {
                let prices: Vec<Value> = self.prices.iter().map(Price::to_payload).collect();
                map.insert(
                    "periods".to_string(),
                    json!([{
                        "type": interval,
                        "quantity": self.interval_count().unwrap_or(1),
                        "prices": prices,
                    }]),
                );
            }
        }
        plan
    }
}

impl Validate for Plan {
    fn validate(&self) -> Result<()> {
        if self.id.is_none() && self.reference.is_none() {
            return Err(GatewayError::invalid_item("Plan requires id or reference."));
        }
        if self.interval_count() == Some(0) {
            return Err(GatewayError::invalid_item("Plan interval count must be at least 1."));
        }
        self.prices.iter().try_for_each(Validate::validate)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prices: Vec<Price>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
}

impl Parameters for Product {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl Product {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        id => set_id;
        reference => set_reference;
        /// Default plan identifier, used when no [`Plan`] object is attached.
        plan_id => set_plan_id;
        plan_reference => set_plan_reference;
        tax_classification => set_tax_classification;
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn set_plan(&mut self, plan: Plan) -> &mut Self {
        self.plan = Some(plan);
        self
    }

    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    pub fn set_prices(&mut self, prices: Vec<Price>) -> &mut Self {
        self.prices = prices;
        self
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn set_attributes(&mut self, attributes: Vec<Attribute>) -> &mut Self {
        self.attributes = attributes;
        self
    }

    pub(crate) fn to_payload(&self) -> Value {
        let mut product = identified("merchantProductId", self.id(), self.reference());
        if let Value::Object(map) = &mut product {
            if let Some(tax) = &self.tax_classification {
                map.insert("taxClassification".to_string(), json!(tax));
            }
            let default_plan = match &self.plan {
                Some(plan) => Some(plan.to_payload()),
                None if self.plan_id.is_some() || self.plan_reference.is_some() => Some(identified(
                    "merchantBillingPlanId",
                    self.plan_id(),
                    self.plan_reference(),
                )),
                None => None,
            };
            if let Some(plan) = default_plan {
                map.insert("defaultBillingPlan".to_string(), plan);
            }
            if !self.prices.is_empty() {
                let prices: Vec<Value> = self.prices.iter().map(Price::to_payload).collect();
                map.insert("prices".to_string(), Value::Array(prices));
            }
            if !self.attributes.is_empty() {
                let attributes: Vec<Value> =
                    self.attributes.iter().map(Attribute::to_payload).collect();
                map.insert("nameValues".to_string(), Value::Array(attributes));
            }
        }
        product
    }
}

impl Validate for Product {
    fn validate(&self) -> Result<()> {
        if self.id.is_none() && self.reference.is_none() {
            return Err(GatewayError::invalid_item("Product requires id or reference."));
        }
        if let Some(plan) = &self.plan {
            plan.validate()?;
        }
        self.prices.iter().try_for_each(Validate::validate)?;
        self.attributes.iter().try_for_each(Validate::validate)
    }
}

/// Contact details sent with a purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(flatten)]
    extra: ParameterBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
}

impl Parameters for Customer {
    fn extra_mut(&mut self) -> &mut ParameterBag {
        &mut self.extra
    }
}

impl Customer {
    pub fn new() -> Self {
        Self::default()
    }

    text_parameters! {
        name => set_name;
        email => set_email;
        postcode => set_postcode;
        /// ISO 3166 alpha-2 country code.
        country => set_country;
    }

    /// Fields merged into the provider's account object.
    pub(crate) fn to_payload(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(name) = &self.name {
            map.insert("name".to_string(), json!(name));
        }
        if let Some(email) = &self.email {
            map.insert("emailAddress".to_string(), json!(email));
        }
        if self.postcode.is_some() || self.country.is_some() {
            map.insert(
                "shippingAddress".to_string(),
                json!({ "postalCode": self.postcode, "country": self.country }),
            );
        }
        map
    }
}

impl Validate for Customer {
    fn validate(&self) -> Result<()> {
        if self.name.is_none() && self.email.is_none() {
            return Err(GatewayError::invalid_item("Customer requires name or email."));
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(GatewayError::invalid_item("Customer email is invalid."));
            }
        }
        Ok(())
    }
}
