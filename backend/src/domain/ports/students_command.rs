//! Driving port for registering students.
//!
//! Registration failures are reported as [`StudentRegistrationError`] so
//! callers can tell a duplicate email apart from an infrastructure fault.
//! Inbound adapters convert it to the shared [`Error`] payload.

use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use crate::domain::{Error, NewStudent, Student};

/// Client-facing message for connection failures; the cause is only logged.
pub const STORAGE_UNAVAILABLE_MESSAGE: &str = "student storage is unavailable";

/// Why a registration did not produce a student.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentRegistrationError {
    /// Another student already holds this email.
    #[error("email {email} is already registered")]
    DuplicateEmail { email: String },
    /// Storage was unreachable.
    #[error("student storage is unavailable: {message}")]
    Unavailable { message: String },
    /// Storage rejected the operation for another reason.
    #[error("student storage failed: {message}")]
    Storage { message: String },
}

impl From<StudentRegistrationError> for Error {
    fn from(value: StudentRegistrationError) -> Self {
        match value {
            StudentRegistrationError::DuplicateEmail { email } => {
                Error::conflict(format!("email {email} is already registered"))
                    .with_details(json!({ "field": "email", "code": "duplicate_email" }))
            }
            StudentRegistrationError::Unavailable { message } => {
                error!(cause = %message, "student registration failed: storage unavailable");
                Error::service_unavailable(STORAGE_UNAVAILABLE_MESSAGE)
            }
            StudentRegistrationError::Storage { message } => {
                error!(cause = %message, "student registration failed: storage error");
                Error::internal("student storage failed")
            }
        }
    }
}

/// Use-case port consumed by inbound adapters to register students.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentsCommand: Send + Sync {
    /// Register `student`, assigning it a fresh id.
    async fn add_student(&self, student: NewStudent) -> Result<Student, StudentRegistrationError>;
}
