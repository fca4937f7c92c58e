//! Outbound adapters implementing domain ports for infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repository using Diesel.
//! - **memory**: process-local repository used when no database is
//!   configured and by tests.
//!
//! Adapters are thin translators between domain types and storage
//! representations; they contain no business logic.

pub mod memory;
pub mod persistence;
