//! Driven port for student record storage.
//!
//! Adapters persist [`NewStudent`] candidates, assign identifiers, and enforce
//! email uniqueness. The domain never sees driver-specific error types.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewStudent, Student};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by student repository adapters.
    pub enum StudentPersistenceError {
        /// Storage could not be reached.
        Connection { message: String } => "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "student repository query failed: {message}",
        /// Storage refused the write because the email is already taken.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Every stored student in ascending id order.
    async fn find_all(&self) -> Result<Vec<Student>, StudentPersistenceError>;

    /// Look up a student by exact email value.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Student>, StudentPersistenceError>;

    /// Persist `student`, returning the record with its assigned id.
    ///
    /// Implementations must report a uniqueness violation as
    /// [`StudentPersistenceError::DuplicateEmail`] even when a concurrent
    /// writer won the race after [`StudentRepository::find_by_email`].
    async fn save(&self, student: &NewStudent) -> Result<Student, StudentPersistenceError>;
}
