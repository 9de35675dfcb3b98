//! Error types for the trip journal
//!
//! All errors use thiserror for structured error handling.
//! Every failure is returned to the caller; nothing here is retried.
//! These errors can be serialized to a frontend.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// A required field is missing or a value is out of range
    #[error("Validation error: {0}")]
    Validation(String),

    /// An id did not resolve
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Stored bytes could not be decoded as a trip collection
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// The underlying store could not be reached or timed out
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::StorageUnavailable(format!("IO error: {}", e))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::StorageUnavailable(format!("Database error: {}", e))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::CorruptData(e.to_string())
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity() {
        let err = AppError::not_found("Photo", "abc");
        assert_eq!(err.to_string(), "Photo not found: abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_io_error_maps_to_storage_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
    }

    #[test]
    fn test_json_error_maps_to_corrupt_data() {
        let json_err = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::CorruptData(_)));
    }

    #[test]
    fn test_serializes_as_display_string() {
        let err = AppError::validation("Destination is required");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#""Validation error: Destination is required""#);
    }
}
