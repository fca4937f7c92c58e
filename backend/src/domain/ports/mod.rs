//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports ([`StudentsQuery`], [`StudentsCommand`]) are what inbound
//! adapters call. The driven port ([`StudentRepository`]) is what storage
//! adapters implement; its errors are strongly typed so adapters map driver
//! failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod student_repository;
mod students_command;
mod students_query;

#[cfg(test)]
pub use student_repository::MockStudentRepository;
pub use student_repository::{StudentPersistenceError, StudentRepository};
#[cfg(test)]
pub use students_command::MockStudentsCommand;
pub use students_command::{
    STORAGE_UNAVAILABLE_MESSAGE, StudentRegistrationError, StudentsCommand,
};
#[cfg(test)]
pub use students_query::MockStudentsQuery;
pub use students_query::StudentsQuery;
