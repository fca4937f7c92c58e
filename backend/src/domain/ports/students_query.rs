//! Driving port for reading student records.

use async_trait::async_trait;

use crate::domain::{Error, Student};

/// Use-case port consumed by inbound adapters to list students.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentsQuery: Send + Sync {
    /// Return every student in ascending id order. An empty store yields an
    /// empty list, never an error.
    async fn list_students(&self) -> Result<Vec<Student>, Error>;
}
