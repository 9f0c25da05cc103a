use crate::core::{ConfigProvider, Transport};
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// JSON-over-HTTP transport: one POST per call to `{endpoint}/{object}`,
/// authenticated with the gateway's basic-auth credentials.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
}

impl HttpTransport {
    pub fn new(
        endpoint: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        validate_url("endpoint", endpoint)?;
        let username = username.into();
        validate_non_empty_string("username", &username)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            username,
            password: password.into(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        tracing::debug!(
            "Using {} endpoint {}",
            if config.test_mode() { "test" } else { "production" },
            config.endpoint()
        );
        Self::new(
            config.endpoint(),
            config.username(),
            config.password(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn object_url(&self, object: &str) -> String {
        format!("{}/{}", self.endpoint, object)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, object: &str, payload: &Value) -> Result<Value> {
        let url = self.object_url(object);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Reply status {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(GatewayError::ProviderFault {
                code: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            GatewayError::invalid_response(format!("Reply from {} is not valid JSON: {}", url, e))
        })
    }
}
