//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{StudentsCommand, StudentsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub students: Arc<dyn StudentsQuery>,
    pub registrations: Arc<dyn StudentsCommand>,
}

impl HttpState {
    /// Construct state from the two driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use student_records::domain::StudentService;
    /// use student_records::inbound::http::state::HttpState;
    /// use student_records::outbound::memory::InMemoryStudentRepository;
    ///
    /// let service = Arc::new(StudentService::new(Arc::new(
    ///     InMemoryStudentRepository::new(),
    /// )));
    /// let state = HttpState::new(service.clone(), service);
    /// let _students = state.students.clone();
    /// ```
    pub fn new(students: Arc<dyn StudentsQuery>, registrations: Arc<dyn StudentsCommand>) -> Self {
        Self {
            students,
            registrations,
        }
    }
}
