use crate::core::ConfigProvider;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub gateway: GatewaySection,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySection {
    pub endpoint: String,
    pub test_endpoint: Option<String>,
    pub username: String,
    pub password: String,
    pub test_mode: Option<bool>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses after replacing `${VAR}` with the environment value.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| GatewayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written so validation can point at them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GatewayError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("gateway.endpoint", &self.gateway.endpoint)?;
        if let Some(test_endpoint) = &self.gateway.test_endpoint {
            validate_url("gateway.test_endpoint", test_endpoint)?;
        }
        if self.test_mode() {
            validate_required_field("gateway.test_endpoint", &self.gateway.test_endpoint)?;
        }

        validate_non_empty_string("gateway.username", &self.gateway.username)?;
        validate_non_empty_string("gateway.password", &self.gateway.password)?;
        for (field, value) in [
            ("gateway.username", &self.gateway.username),
            ("gateway.password", &self.gateway.password),
        ] {
            if value.starts_with("${") {
                return Err(GatewayError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        validate_range("gateway.timeout_seconds", self.timeout_seconds(), 1, 300)?;
        Ok(())
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.gateway.endpoint = endpoint.into();
    }

    pub fn set_test_mode(&mut self, test_mode: bool) {
        self.gateway.test_mode = Some(test_mode);
    }

    pub fn debug_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .is_some_and(|level| level.eq_ignore_ascii_case("debug"))
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        match (&self.gateway.test_endpoint, self.test_mode()) {
            (Some(test_endpoint), true) => test_endpoint,
            _ => &self.gateway.endpoint,
        }
    }

    fn username(&self) -> &str {
        &self.gateway.username
    }

    fn password(&self) -> &str {
        &self.gateway.password
    }

    fn timeout_seconds(&self) -> u64 {
        self.gateway
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn test_mode(&self) -> bool {
        self.gateway.test_mode.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
