use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Sends one provider call and returns the structured reply.
///
/// `object` names the provider object (`Transaction`, `AutoBill`, ...); the
/// payload carries the action tag. Implementations make a single attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, object: &str, payload: &Value) -> Result<Value>;
}

pub trait ConfigProvider: Send + Sync {
    /// Endpoint in effect for the current mode.
    fn endpoint(&self) -> &str;
    fn username(&self) -> &str;
    fn password(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn test_mode(&self) -> bool;
}
