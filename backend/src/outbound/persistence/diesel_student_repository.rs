//! PostgreSQL-backed `StudentRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is enforced by the `students_email_key` index; a
//! concurrent registration that loses the race surfaces as
//! [`StudentPersistenceError::DuplicateEmail`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{StudentPersistenceError, StudentRepository};
use crate::domain::{EmailAddress, NewStudent, Student};

use super::models::{NewStudentRow, StudentRow};
use super::pool::{DbPool, PoolError};
use super::schema::students;

/// Diesel-backed implementation of the `StudentRepository` port.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StudentPersistenceError {
    StudentPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: DieselError) -> StudentPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StudentPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => StudentPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StudentPersistenceError::connection("database connection error")
        }
        _ => StudentPersistenceError::query("database error"),
    }
}

/// Like [`map_diesel_error`], but reports a unique violation on insert as a
/// duplicate of `email`.
fn map_insert_error(error: DieselError, email: &EmailAddress) -> StudentPersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StudentPersistenceError::duplicate_email(email.as_ref())
        }
        other => map_diesel_error(other),
    }
}

fn row_to_student(row: StudentRow) -> Result<Student, StudentPersistenceError> {
    let StudentRow { id, name, email } = row;
    Student::try_from_parts(id, name, email).map_err(|err| {
        StudentPersistenceError::query(format!("corrupted student row {id}: {err}"))
    })
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn find_all(&self) -> Result<Vec<Student>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<StudentRow> = students::table
            .order(students::id.asc())
            .select(StudentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_student).collect()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Student>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<StudentRow> = students::table
            .filter(students::email.eq(email.as_ref()))
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_student).transpose()
    }

    async fn save(&self, student: &NewStudent) -> Result<Student, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewStudentRow {
            name: student.name().as_ref(),
            email: student.email().as_ref(),
        };

        let row: StudentRow = diesel::insert_into(students::table)
            .values(&new_row)
            .returning(StudentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, student.email()))?;

        row_to_student(row)
    }
}
