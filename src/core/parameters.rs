use crate::utils::error::{GatewayError, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::str::FromStr;

/// Ordered name → value storage shared by requests and value objects.
///
/// Keys are case-sensitive; setting an existing key overwrites it and keeps its
/// position. Reading an unset key yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterBag(Map<String, Value>);

impl ParameterBag {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// True when the key is present with a non-null value.
    pub fn contains(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(value) if !value.is_null())
    }

    pub fn all(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Replaces the whole contents.
    pub fn initialize(&mut self, parameters: impl Into<ParameterBag>) -> &mut Self {
        *self = parameters.into();
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Fails on the first name whose value is absent or null.
    pub fn validate_present(&self, names: &[&str]) -> Result<()> {
        for name in names {
            if !self.contains(name) {
                return Err(GatewayError::invalid_request(format!(
                    "The {} parameter is required",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl From<Map<String, Value>> for ParameterBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for ParameterBag {
    type Error = GatewayError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(GatewayError::invalid_request(format!(
                "Parameters must be an object, got {}",
                other
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParameterBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for ParameterBag {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Uniform parameter surface of requests and value objects.
///
/// Implementors are typed structs whose serde field names are the wire
/// parameter names; keys they do not know land in a flattened
/// [`ParameterBag`] and survive a round trip. The bag is declared before the
/// typed fields so a value set later overrides a null it was given.
pub trait Parameters: Serialize + DeserializeOwned + Sized {
    /// The flattened bag holding unknown keys and explicit nulls.
    fn extra_mut(&mut self) -> &mut ParameterBag;

    fn from_parameters(parameters: impl Into<ParameterBag>) -> Result<Self> {
        let mut map = parameters.into().into_inner();
        let nulls: Vec<String> = map
            .iter()
            .filter(|(_, value)| value.is_null())
            .map(|(name, _)| name.clone())
            .collect();
        map.retain(|_, value| !value.is_null());

        let mut typed: Self = serde_json::from_value(Value::Object(map))
            .map_err(|e| GatewayError::invalid_request(format!("Invalid parameters: {}", e)))?;
        let extra = typed.extra_mut();
        for name in nulls {
            extra.set(name, Value::Null);
        }
        Ok(typed)
    }

    /// Replaces every parameter with the given set and returns `self`.
    fn initialize(&mut self, parameters: impl Into<ParameterBag>) -> Result<&mut Self> {
        *self = Self::from_parameters(parameters)?;
        Ok(self)
    }

    /// Current parameters keyed by wire name. Unset parameters are omitted;
    /// parameters initialized to null read back as null.
    fn parameters(&self) -> ParameterBag {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => ParameterBag(map),
            _ => ParameterBag::new(),
        }
    }
}

/// Monetary parameter given as a decimal string or a JSON number. Reads as
/// text and writes back in the form it arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    text: String,
    numeric: bool,
}

impl Decimal {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<String> for Decimal {
    fn from(text: String) -> Self {
        Self {
            text,
            numeric: false,
        }
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.numeric {
            if let Ok(number) = Number::from_str(&self.text) {
                return number.serialize(serializer);
            }
        }
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(Self {
                text,
                numeric: false,
            }),
            Value::Number(number) => Ok(Self {
                text: number.to_string(),
                numeric: true,
            }),
            other => Err(D::Error::custom(format!(
                "invalid type: {}, expected a decimal string or number",
                other
            ))),
        }
    }
}

/// Non-negative count or index given as a JSON number or a numeric string.
/// Writes back in the form it arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count {
    value: u32,
    quoted: bool,
}

impl Count {
    pub fn get(&self) -> u32 {
        self.value
    }
}

impl From<u32> for Count {
    fn from(value: u32) -> Self {
        Self {
            value,
            quoted: false,
        }
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.quoted {
            serializer.serialize_str(&self.value.to_string())
        } else {
            serializer.serialize_u32(self.value)
        }
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (value, quoted) = match Value::deserialize(deserializer)? {
            Value::Number(number) => (number.as_u64().and_then(|n| u32::try_from(n).ok()), false),
            Value::String(text) => (text.trim().parse::<u32>().ok(), true),
            _ => (None, false),
        };
        value
            .map(|value| Self { value, quoted })
            .ok_or_else(|| D::Error::custom("expected a non-negative integer or numeric string"))
    }
}

/// Getter/fluent-setter pairs for optional string parameters.
macro_rules! text_parameters {
    ($($(#[$meta:meta])* $name:ident => $setter:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Option<&str> {
                self.$name.as_deref()
            }

            pub fn $setter(&mut self, value: impl Into<String>) -> &mut Self {
                self.$name = Some(value.into());
                self
            }
        )*
    };
}

/// Getter/fluent-setter pairs for optional `Copy` parameters.
macro_rules! value_parameters {
    ($($(#[$meta:meta])* $name:ident => $setter:ident: $ty:ty;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Option<$ty> {
                self.$name
            }

            pub fn $setter(&mut self, value: $ty) -> &mut Self {
                self.$name = Some(value);
                self
            }
        )*
    };
}

/// Getter/fluent-setter pairs for [`Decimal`] parameters, read as text.
macro_rules! decimal_parameters {
    ($($(#[$meta:meta])* $name:ident => $setter:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Option<&str> {
                self.$name.as_ref().map($crate::core::parameters::Decimal::as_str)
            }

            pub fn $setter(&mut self, value: impl Into<String>) -> &mut Self {
                self.$name = Some($crate::core::parameters::Decimal::from(value.into()));
                self
            }
        )*
    };
}

/// Getter/fluent-setter pairs for [`Count`] parameters.
macro_rules! count_parameters {
    ($($(#[$meta:meta])* $name:ident => $setter:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Option<u32> {
                self.$name.map(|count| count.get())
            }

            pub fn $setter(&mut self, value: u32) -> &mut Self {
                self.$name = Some($crate::core::parameters::Count::from(value));
                self
            }
        )*
    };
}

pub(crate) use count_parameters;
pub(crate) use decimal_parameters;
pub(crate) use text_parameters;
pub(crate) use value_parameters;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        #[serde(flatten)]
        extra: ParameterBag,
        #[serde(skip_serializing_if = "Option::is_none")]
        customer_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        amount: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        quantity: Option<Count>,
        #[serde(skip_serializing_if = "Option::is_none")]
        active: Option<bool>,
    }

    impl Parameters for Sample {
        fn extra_mut(&mut self) -> &mut ParameterBag {
            &mut self.extra
        }
    }

    impl Sample {
        text_parameters! {
            customer_id => set_customer_id;
        }

        decimal_parameters! {
            amount => set_amount;
        }

        count_parameters! {
            quantity => set_quantity;
        }

        value_parameters! {
            active => set_active: bool;
        }
    }

    #[test]
    fn test_set_overwrites_and_keeps_order() {
        let mut bag = ParameterBag::new();
        bag.set("b", 1).set("a", "x").set("b", 2);

        let keys: Vec<&String> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(bag.get("b"), Some(&json!(2)));
        assert_eq!(bag.get("missing"), None);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut bag = ParameterBag::new();
        bag.set("invoiceState", "Paid").set("invoicestate", "Due");
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get_str("invoiceState"), Some("Paid"));
    }

    #[test]
    fn test_validate_present_treats_null_as_missing() {
        let mut bag = ParameterBag::new();
        bag.set("amount", "9.99").set("currency", Value::Null);

        assert!(bag.validate_present(&["amount"]).is_ok());
        let err = bag.validate_present(&["amount", "currency"]).unwrap_err();
        assert_eq!(err.message(), "The currency parameter is required");
    }

    #[test]
    fn test_initialize_replaces_contents() {
        let mut bag: ParameterBag = [("old", "value")].into_iter().collect();
        let replacement: ParameterBag = [("new", 1)].into_iter().collect();
        bag.initialize(replacement);

        assert!(!bag.contains("old"));
        assert!(bag.contains("new"));
    }

    #[test]
    fn test_typed_round_trip_keeps_unknown_keys() {
        let input = json!({"customerId": "c-1", "quantity": 3, "futureField": "kept"});
        let bag = ParameterBag::try_from(input.clone()).unwrap();

        let mut sample = Sample::default();
        sample.initialize(bag.clone()).unwrap();

        assert_eq!(sample.customer_id(), Some("c-1"));
        assert_eq!(sample.quantity(), Some(3));
        assert_eq!(sample.parameters(), bag);
    }

    #[test]
    fn test_setters_chain_on_same_instance() {
        let mut sample = Sample::default();
        let ptr: *const Sample = &sample;
        let returned = sample.set_customer_id("c-2").set_quantity(1);
        assert!(std::ptr::eq(ptr, returned));
    }

    #[test]
    fn test_initialize_rejects_wrong_types() {
        let mut sample = Sample::default();
        let bag = ParameterBag::try_from(json!({"quantity": "many"})).unwrap();
        let err = sample.initialize(bag).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_round_trip_keeps_explicit_nulls() {
        let bag = ParameterBag::try_from(json!({"customerId": null, "amount": "9.99"})).unwrap();

        let sample = Sample::from_parameters(bag.clone()).unwrap();
        assert_eq!(sample.customer_id(), None);
        assert_eq!(sample.parameters(), bag);
        assert!(sample.parameters().validate_present(&["customerId"]).is_err());
    }

    #[test]
    fn test_value_set_after_null_wins() {
        let bag = ParameterBag::try_from(json!({"customerId": null})).unwrap();
        let mut sample = Sample::from_parameters(bag).unwrap();
        sample.set_customer_id("c-9");

        let params = sample.parameters();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get_str("customerId"), Some("c-9"));
    }

    #[test]
    fn test_numeric_and_quoted_scalars_round_trip() {
        let bag = ParameterBag::try_from(json!({"amount": 9.99, "quantity": "2", "active": true}))
            .unwrap();

        let sample = Sample::from_parameters(bag.clone()).unwrap();
        assert_eq!(sample.amount(), Some("9.99"));
        assert_eq!(sample.quantity(), Some(2));
        assert_eq!(sample.active(), Some(true));
        assert_eq!(sample.parameters(), bag);

        let integral = ParameterBag::try_from(json!({"amount": 10, "quantity": 3})).unwrap();
        let sample = Sample::from_parameters(integral.clone()).unwrap();
        assert_eq!(sample.amount(), Some("10"));
        assert_eq!(sample.parameters(), integral);
    }

    #[test]
    fn test_setters_write_canonical_forms() {
        let mut sample = Sample::default();
        sample.set_amount("4.50").set_quantity(1);
        assert_eq!(
            Value::Object(sample.parameters().into_inner()),
            json!({"amount": "4.50", "quantity": 1})
        );
    }

    #[test]
    fn test_non_numeric_count_is_rejected() {
        let bag = ParameterBag::try_from(json!({"quantity": "-1"})).unwrap();
        assert!(Sample::from_parameters(bag).unwrap_err().is_validation());

        let bag = ParameterBag::try_from(json!({"amount": true})).unwrap();
        assert!(Sample::from_parameters(bag).unwrap_err().is_validation());
    }
}
