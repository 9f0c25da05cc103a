use crate::core::parameters::Parameters;
use crate::core::response::Response;
use crate::utils::error::Result;
use serde_json::{Map, Value};

/// Provider objects the operations address.
pub mod objects {
    pub const ACCOUNT: &str = "Account";
    pub const AUTOBILL: &str = "AutoBill";
    pub const REFUND: &str = "Refund";
    pub const TRANSACTION: &str = "Transaction";
}

/// Per-operation hooks plugged into the shared send pipeline.
///
/// A concrete request only describes *what* its call looks like; ordering is
/// owned by [`Operation::get_data`] and [`crate::Gateway::send`], so required
/// parameters and embedded items are always validated before a payload exists.
pub trait Operation: Parameters + Send + Sync {
    /// Provider object the call targets.
    fn object(&self) -> &'static str;

    /// Provider action; may depend on which parameters are set.
    fn action(&self) -> &'static str;

    /// Wire names that must be present and non-null.
    fn required_parameters(&self) -> &'static [&'static str] {
        &[]
    }

    /// Operation-specific rules: either/or identifiers, embedded value objects.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Call body without the action tag.
    fn build_payload(&self) -> Result<Map<String, Value>>;

    /// Wraps the raw reply. Overridden where the reply must carry data the
    /// response accessors rely on.
    fn build_response(self, reply: Value) -> Result<Response<Self>> {
        Ok(Response::new(self, reply))
    }

    /// Validated payload with `action` as its first key.
    fn get_data(&self) -> Result<Value> {
        self.parameters()
            .validate_present(self.required_parameters())?;
        self.validate()?;

        let mut data = Map::new();
        data.insert("action".to_string(), Value::from(self.action()));
        data.extend(self.build_payload()?);
        Ok(Value::Object(data))
    }
}
