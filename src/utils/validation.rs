use crate::utils::error::{FieldError, ProfileError, Result};
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 名稱欄位的最大長度
pub const MAX_NAME_LENGTH: usize = 128;

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ProfileError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<()> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(ProfileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// 實體名稱：非空白且不超過 [`MAX_NAME_LENGTH`] 字元。
/// 失敗時以文件驗證錯誤回報，而非設定錯誤。
pub fn validate_entity_name(target: &'static str, name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("name cannot be empty".to_string())
    } else if name.chars().count() > MAX_NAME_LENGTH {
        Some(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        ))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ProfileError::validation(
            target,
            vec![FieldError::invalid("name", reason)],
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("client.base_url", "https://example.com").is_ok());
        assert!(validate_url("client.base_url", "http://example.com").is_ok());
        assert!(validate_url("client.base_url", "").is_err());
        assert!(validate_url("client.base_url", "invalid-url").is_err());
        assert!(validate_url("client.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind", "127.0.0.1:8090").is_ok());
        assert!(validate_socket_addr("server.bind", "localhost").is_err());
    }

    #[test]
    fn test_validate_entity_name() {
        assert!(validate_entity_name("ElectricalProfilesSet", "2023 profiles").is_ok());
        assert!(validate_entity_name("ElectricalProfilesSet", "   ").is_err());

        let long_name = "x".repeat(MAX_NAME_LENGTH + 1);
        match validate_entity_name("ElectricalProfilesSet", &long_name) {
            Err(ProfileError::ValidationError { errors, .. }) => {
                assert_eq!(errors[0].path, "name");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("logging.format", "json", &["compact", "json"]).is_ok());
        assert!(validate_one_of("logging.format", "xml", &["compact", "json"]).is_err());
    }
}
