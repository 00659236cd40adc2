use std::fmt;
use thiserror::Error;

/// 單一欄位的驗證失敗
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub path: String,
    pub kind: FieldErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    WrongType { expected: String, found: String },
    InvalidValue { reason: String },
}

impl FieldError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FieldErrorKind::Missing,
        }
    }

    pub fn wrong_type(path: impl Into<String>, expected: &str, found: &str) -> Self {
        Self {
            path: path.into(),
            kind: FieldErrorKind::WrongType {
                expected: expected.to_string(),
                found: found.to_string(),
            },
        }
    }

    pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FieldErrorKind::InvalidValue {
                reason: reason.into(),
            },
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{}: field required", self.path),
            FieldErrorKind::WrongType { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.path, expected, found)
            }
            FieldErrorKind::InvalidValue { reason } => write!(f, "{}: {}", self.path, reason),
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Validation error for {target}: {}", join_field_errors(.errors))]
    ValidationError {
        target: &'static str,
        errors: Vec<FieldError>,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Cannot delete {entity} {id}: still referenced by {blocking} {referenced_by:?}")]
    Conflict {
        entity: &'static str,
        id: String,
        blocking: &'static str,
        referenced_by: Vec<u64>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected HTTP response {status} from {url}")]
    UnexpectedResponse { status: u16, url: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProfileError {
    pub fn validation(target: &'static str, errors: Vec<FieldError>) -> Self {
        ProfileError::ValidationError { target, errors }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ProfileError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ProfileError::NotFound { .. } => ErrorSeverity::Low,
            ProfileError::ValidationError { .. }
            | ProfileError::Conflict { .. }
            | ProfileError::InvalidConfigValueError { .. }
            | ProfileError::ConfigError { .. } => ErrorSeverity::High,
            ProfileError::ApiError(_) | ProfileError::UnexpectedResponse { .. } => {
                ErrorSeverity::Medium
            }
            ProfileError::IoError(_) | ProfileError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 對應到 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self {
            ProfileError::ValidationError { .. } => 422,
            ProfileError::NotFound { .. } => 404,
            ProfileError::Conflict { .. } => 409,
            ProfileError::UnexpectedResponse { .. } | ProfileError::ApiError(_) => 502,
            _ => 500,
        }
    }

    /// 不洩漏內部細節的訊息，供 API 回應與終端輸出使用
    pub fn user_friendly_message(&self) -> String {
        match self {
            ProfileError::ValidationError { errors, .. } => {
                format!("Document rejected: {} field(s) failed validation", errors.len())
            }
            ProfileError::NotFound { .. } => "Not found.".to_string(),
            ProfileError::Conflict { referenced_by, .. } => format!(
                "Deletion blocked by {} referencing timetable(s)",
                referenced_by.len()
            ),
            ProfileError::ConfigError { .. } | ProfileError::InvalidConfigValueError { .. } => {
                self.to_string()
            }
            ProfileError::ApiError(_) | ProfileError::UnexpectedResponse { .. } => {
                "Upstream service unavailable".to_string()
            }
            ProfileError::IoError(_) | ProfileError::SerializationError(_) => {
                "Internal storage error".to_string()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProfileError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
