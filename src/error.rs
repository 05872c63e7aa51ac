use std::collections::BTreeMap;
use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::schedule::Court;

/// Per-field validation messages, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field; the first message per field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{court} is already booked at {start} (booking {existing_id})")]
    Conflict {
        court: Court,
        start: String,
        existing_id: String,
    },

    #[error("Unknown court: {0}")]
    UnknownCourt(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Opening hours {opening}:00-{closing}:00 must fall within one day, opening before closing")]
    InvalidHours { opening: u32, closing: u32 },

    #[error("Booking submission failed: {0}")]
    Submission(String),

    #[error("Shared state lock poisoned")]
    StatePoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AdminError>;

impl ResponseError for AdminError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AdminError::Conflict { .. } => StatusCode::CONFLICT,
            AdminError::UnknownCourt(_) | AdminError::InvalidTime(_) => StatusCode::BAD_REQUEST,
            AdminError::Submission(_) => StatusCode::BAD_GATEWAY,
            AdminError::InvalidHours { .. }
            | AdminError::StatePoisoned
            | AdminError::Io(_)
            | AdminError::Csv(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AdminError::Validation(fields) => serde_json::json!({
                "success": false,
                "error": "Validation failed",
                "fields": fields,
            }),
            other => serde_json::json!({
                "success": false,
                "error": other.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.add("court", "first");
        errors.add("court", "second");
        assert_eq!(errors.get("court"), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AdminError::Validation(FieldErrors::new()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let conflict = AdminError::Conflict {
            court: Court::Two,
            start: "14:00".to_string(),
            existing_id: "7".to_string(),
        };
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(conflict.to_string(), "Teren 2 is already booked at 14:00 (booking 7)");
        assert_eq!(AdminError::InvalidTime("25:00".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AdminError::Submission("down".into()).status_code(), StatusCode::BAD_GATEWAY);
    }
}
