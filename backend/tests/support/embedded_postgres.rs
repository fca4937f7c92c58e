//! Fresh, migrated databases on an embedded PostgreSQL cluster.
//!
//! Database creation goes through `postgres` because `CREATE DATABASE` cannot
//! run inside the transaction Diesel wraps around migrations. The schema
//! itself comes from the crate's embedded Diesel migrations so tests never
//! drift from production.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use student_records::outbound::persistence::MIGRATIONS;
use uuid::Uuid;

use super::format_postgres_error;

const MAINTENANCE_DATABASE: &str = "postgres";

/// Create a uniquely named database, apply every migration, and return its URL.
pub fn provision_migrated_database(cluster: &TestCluster) -> Result<String, String> {
    let name = format!("students_{}", Uuid::new_v4().simple());
    let maintenance_url = cluster.connection().database_url(MAINTENANCE_DATABASE);

    let mut client = Client::connect(&maintenance_url, NoTls)
        .map_err(|err| format!("connect: {}", format_postgres_error(&err)))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{name}\";"))
        .map_err(|err| format!("create database: {}", format_postgres_error(&err)))?;

    let url = cluster.connection().database_url(&name);
    migrate_schema(&url)?;
    Ok(url)
}

/// Runs all pending Diesel migrations against the test database.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err:?}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err:?}"))?;
    Ok(())
}

/// Drop the `students` table to simulate schema loss.
pub fn drop_students_table(url: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute("DROP TABLE IF EXISTS students;")
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}
