//! Structured error types for repository operations.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (caught before any gateway call)
    MissingRequiredField,

    // Not found errors
    TaskNotFound,

    // Gateway reported a soft failure (success flag false / no data)
    FetchFailed,
    CreateFailed,
    UpdateFailed,
    DeleteFailed,

    // Transport or gateway-internal errors
    GatewayError,
}

/// Structured error for repository operations.
#[derive(Debug, Serialize)]
pub struct ServiceError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ServiceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn fetch_failed(what: &str, err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::FetchFailed, format!("Failed to fetch {}", what))
            .with_details(err.to_string())
    }

    pub fn create_failed(what: &str) -> Self {
        Self::new(ErrorCode::CreateFailed, format!("Failed to create {}", what))
    }

    pub fn update_failed(what: &str) -> Self {
        Self::new(ErrorCode::UpdateFailed, format!("Failed to update {}", what))
    }

    pub fn delete_failed(what: &str) -> Self {
        Self::new(ErrorCode::DeleteFailed, format!("Failed to delete {}", what))
    }

    pub fn gateway(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::GatewayError, err.to_string())
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ServiceError {}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to ServiceError first
        match err.downcast::<ServiceError>() {
            Ok(service_err) => service_err,
            Err(err) => ServiceError::gateway(err),
        }
    }
}

/// Result type for repository operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_sets_code_and_field() {
        let err = ServiceError::missing_field("id");
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        assert_eq!(err.field.as_deref(), Some("id"));
        assert_eq!(err.message, "id is required");
    }

    #[test]
    fn anyhow_conversion_preserves_service_error() {
        let inner = ServiceError::task_not_found("42");
        let wrapped: anyhow::Error = inner.into();
        let back: ServiceError = wrapped.into();
        assert_eq!(back.code, ErrorCode::TaskNotFound);
    }

    #[test]
    fn anyhow_conversion_wraps_foreign_errors() {
        let err: ServiceError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.code, ErrorCode::GatewayError);
        assert_eq!(err.message, "connection reset");
    }
}
