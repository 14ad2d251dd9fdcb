use crate::utils::error::{ChartError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ChartError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ChartError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ChartError::InvalidConfigValueError {
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
        return Err(ChartError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// API 憑證必須成對提供：有金鑰就必須有使用者 ID
pub fn validate_credentials(user_id: &Option<String>, api_key: &Option<String>) -> Result<()> {
    if api_key.is_some() {
        let user_id = validate_required_field("api.user_id", user_id)?;
        validate_non_empty_string("api.user_id", user_id)?;
    }
    if let Some(key) = api_key {
        validate_non_empty_string("api.key", key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.endpoint", "https://json.astrologyapi.com/v1/planets/tropical").is_ok());
        assert!(validate_url("api.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("api.endpoint", "").is_err());
        assert!(validate_url("api.endpoint", "invalid-url").is_err());
        assert!(validate_url("api.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("api.timeout_seconds", 10, 1, 120).is_ok());
        assert!(validate_range("api.timeout_seconds", 0, 1, 120).is_err());
        assert!(validate_range("api.timeout_seconds", 121, 1, 120).is_err());
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials(&None, &None).is_ok());
        assert!(validate_credentials(&Some("user".to_string()), &Some("key".to_string())).is_ok());

        let err = validate_credentials(&None, &Some("key".to_string())).unwrap_err();
        assert!(matches!(err, ChartError::MissingConfigError { .. }));

        assert!(validate_credentials(&Some("  ".to_string()), &Some("key".to_string())).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.path", "./charts").is_ok());
        assert!(validate_path("output.path", "").is_err());
        assert!(validate_path("output.path", "bad\0path").is_err());
    }
}
