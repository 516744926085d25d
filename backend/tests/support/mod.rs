//! Shared helpers for the PostgreSQL-backed integration suites.
//!
//! Each file under `backend/tests/` compiles as its own crate, so suites pull
//! these in with `mod support;` and use only what they need.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{reset_database, seed_user};

/// Render a `postgres` error with its SQLSTATE and detail.
///
/// The `postgres::Error` `Display` implementation often collapses database
/// errors to a generic `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}
