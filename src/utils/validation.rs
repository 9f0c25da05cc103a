use crate::utils::error::{GatewayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GatewayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Same checks as [`validate_url`], reported as a request error so that
/// redirect URLs fail like any other bad parameter.
pub fn validate_request_url(parameter: &str, url_str: &str) -> Result<()> {
    validate_url(parameter, url_str).map_err(|e| match e {
        GatewayError::InvalidConfigValueError { reason, .. } => GatewayError::invalid_request(
            format!("The {} parameter is invalid: {}", parameter, reason),
        ),
        other => other,
    })
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| GatewayError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// Drops empty or whitespace-only values.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Either/or identifier check: fails only when both alternatives are absent.
/// Blank strings count as absent.
pub fn validate_either(
    first_name: &str,
    first: Option<&str>,
    second_name: &str,
    second: Option<&str>,
) -> Result<()> {
    if non_blank(first).is_none() && non_blank(second).is_none() {
        return Err(GatewayError::invalid_request(format!(
            "Either the {} or {} parameter is required.",
            first_name, second_name
        )));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
