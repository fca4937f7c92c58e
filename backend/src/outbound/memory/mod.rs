//! In-memory student storage.
//!
//! Records live in a `Vec` behind a mutex. The uniqueness check and the
//! insert happen under the same lock, so concurrent registrations of one
//! email can never both succeed.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{StudentPersistenceError, StudentRepository};
use crate::domain::{EmailAddress, NewStudent, Student, StudentId};

#[derive(Debug, Default)]
struct Store {
    students: Vec<Student>,
    last_id: i64,
}

/// Process-local implementation of the `StudentRepository` port.
///
/// Identifiers start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    store: Mutex<Store>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, StudentPersistenceError> {
        self.store
            .lock()
            .map_err(|_| StudentPersistenceError::query("in-memory student store poisoned"))
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn find_all(&self) -> Result<Vec<Student>, StudentPersistenceError> {
        Ok(self.lock()?.students.clone())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Student>, StudentPersistenceError> {
        Ok(self
            .lock()?
            .students
            .iter()
            .find(|student| student.email() == email)
            .cloned())
    }

    async fn save(&self, student: &NewStudent) -> Result<Student, StudentPersistenceError> {
        let mut store = self.lock()?;
        if store
            .students
            .iter()
            .any(|existing| existing.email() == student.email())
        {
            return Err(StudentPersistenceError::duplicate_email(
                student.email().as_ref(),
            ));
        }

        let next = store
            .last_id
            .checked_add(1)
            .ok_or_else(|| StudentPersistenceError::query("student id sequence exhausted"))?;
        let id = StudentId::new(next)
            .map_err(|err| StudentPersistenceError::query(format!("invalid student id: {err}")))?;
        let saved = student.clone().into_student(id);
        store.last_id = next;
        store.students.push(saved.clone());
        Ok(saved)
    }
}
