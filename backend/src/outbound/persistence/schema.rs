//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered students. `email` carries a unique index.
    students (id) {
        /// BIGSERIAL primary key, assigned on insert.
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
        created_at -> Timestamptz,
    }
}
