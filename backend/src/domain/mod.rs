//! Domain primitives, services, and ports.
//!
//! Purpose: define the student record model and the use cases that operate
//! on it, independent of HTTP and storage. Types are immutable once
//! validated and document their serialisation contracts in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Student / NewStudent and their validated fields.
//! - StudentService: implements the driving ports over a repository.
//! - TraceId: per-request correlation identifier.

pub mod error;
pub mod ports;
pub mod student;
pub mod student_service;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::student::{
    EMAIL_MAX, EmailAddress, NewStudent, STUDENT_NAME_MAX, Student, StudentId, StudentName,
    StudentValidationError,
};
pub use self::student_service::StudentService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use student_records::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such student"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
