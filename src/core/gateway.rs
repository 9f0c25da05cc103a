use crate::adapters::http::HttpTransport;
use crate::core::request::Operation;
use crate::core::response::Response;
use crate::domain::ports::{ConfigProvider, Transport};
use crate::utils::error::Result;
use serde_json::Value;

/// Runs requests through validate → build payload → transport → response.
pub struct Gateway<T: Transport> {
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Hands an already built payload to the transport. Only the object and
    /// action are logged; payloads carry customer data.
    pub async fn send_data(&self, object: &str, payload: &Value) -> Result<Value> {
        let action = payload
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::debug!("Dispatching {}.{}", object, action);
        self.transport.call(object, payload).await
    }

    /// Sends a request once. Validation failures return before the transport
    /// is touched; provider-side business failures come back as a response
    /// whose `is_successful()` is false.
    pub async fn send<O: Operation>(&self, request: O) -> Result<Response<O>> {
        let object = request.object();
        let action = request.action();

        let data = request.get_data().map_err(|e| {
            tracing::debug!("{}.{} rejected before sending: {}", object, action, e);
            e
        })?;

        let reply = self.send_data(object, &data).await?;
        let response = request.build_response(reply)?;

        if response.is_successful() {
            tracing::info!("{}.{} succeeded", object, action);
        } else {
            tracing::warn!(
                "{}.{} returned {:?}: {}",
                object,
                action,
                response.code(),
                response.message().unwrap_or("no message")
            );
        }

        Ok(response)
    }
}

impl Gateway<HttpTransport> {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }
}
