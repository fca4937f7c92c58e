//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; row structs (`models.rs`) and table definitions (`schema.rs`) never
//! leak to the domain. Connections come from a `bb8` pool through
//! `diesel-async`, and every driver failure is mapped onto
//! [`crate::domain::ports::StudentPersistenceError`].
//!
//! # Example
//!
//! ```no_run
//! use student_records::outbound::persistence::{DbPool, DieselStudentRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/students")).await?;
//! let repo = DieselStudentRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_student_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_student_repository::DieselStudentRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
