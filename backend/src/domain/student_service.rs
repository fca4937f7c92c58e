//! Student registration and listing services.
//!
//! [`StudentService`] implements both driving ports on top of a
//! [`StudentRepository`]. Registration checks for an existing email first,
//! then relies on the repository to reject any writer that slipped in between
//! the lookup and the insert.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    STORAGE_UNAVAILABLE_MESSAGE, StudentPersistenceError, StudentRegistrationError,
    StudentRepository, StudentsCommand, StudentsQuery,
};
use crate::domain::{Error, NewStudent, Student};

/// Student service implementing the driving ports.
#[derive(Clone)]
pub struct StudentService<R> {
    repository: Arc<R>,
}

impl<R> StudentService<R> {
    /// Create a new service backed by `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> StudentService<R>
where
    R: StudentRepository,
{
    fn map_query_error(error: StudentPersistenceError) -> Error {
        match error {
            StudentPersistenceError::Connection { message } => {
                error!(cause = %message, "student listing failed: storage unavailable");
                Error::service_unavailable(STORAGE_UNAVAILABLE_MESSAGE)
            }
            StudentPersistenceError::Query { message } => {
                error!(cause = %message, "student listing failed: storage error");
                Error::internal("student repository error")
            }
            StudentPersistenceError::DuplicateEmail { email } => {
                Error::internal(format!("unexpected duplicate email on read: {email}"))
            }
        }
    }

    fn map_registration_error(error: StudentPersistenceError) -> StudentRegistrationError {
        match error {
            StudentPersistenceError::Connection { message } => {
                StudentRegistrationError::Unavailable { message }
            }
            StudentPersistenceError::Query { message } => {
                StudentRegistrationError::Storage { message }
            }
            StudentPersistenceError::DuplicateEmail { email } => {
                StudentRegistrationError::DuplicateEmail { email }
            }
        }
    }
}

#[async_trait]
impl<R> StudentsQuery for StudentService<R>
where
    R: StudentRepository,
{
    async fn list_students(&self) -> Result<Vec<Student>, Error> {
        let students = self
            .repository
            .find_all()
            .await
            .map_err(Self::map_query_error)?;
        debug!(count = students.len(), "listed students");
        Ok(students)
    }
}

#[async_trait]
impl<R> StudentsCommand for StudentService<R>
where
    R: StudentRepository,
{
    async fn add_student(&self, student: NewStudent) -> Result<Student, StudentRegistrationError> {
        let existing = self
            .repository
            .find_by_email(student.email())
            .await
            .map_err(Self::map_registration_error)?;
        if existing.is_some() {
            warn!(email = %student.email(), "rejected registration for taken email");
            return Err(StudentRegistrationError::DuplicateEmail {
                email: student.email().to_string(),
            });
        }

        match self.repository.save(&student).await {
            Ok(saved) => {
                info!(student_id = %saved.id(), "registered student");
                Ok(saved)
            }
            Err(error) => {
                let error = Self::map_registration_error(error);
                if matches!(error, StudentRegistrationError::DuplicateEmail { .. }) {
                    warn!(email = %student.email(), "lost registration race for email");
                }
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "student_service_tests.rs"]
mod tests;
