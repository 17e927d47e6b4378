//! Embedded schema migrations applied at server start-up.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("migration connection failed: {message}")]
    Connection {
        /// Driver error text.
        message: String,
    },
    /// A migration failed to apply.
    #[error("migration failed: {message}")]
    Apply {
        /// Harness error text.
        message: String,
    },
    /// The blocking migration task panicked or was cancelled.
    #[error("migration task aborted: {message}")]
    Task {
        /// Join error text.
        message: String,
    },
}

fn apply_blocking(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}

/// Apply every pending migration against `database_url`.
///
/// Diesel's migration harness is synchronous, so the work runs on Tokio's
/// blocking pool.
///
/// # Errors
///
/// Returns [`MigrationError`] when the database is unreachable or a migration
/// fails.
pub async fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || apply_blocking(&url))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })??;
    info!(applied, "database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use diesel::migration::MigrationSource;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn embedded_migrations_are_present() {
        let migrations =
            MigrationSource::<diesel::pg::Pg>::migrations(&MIGRATIONS).expect("embedded set");
        assert!(!migrations.is_empty());
    }

    #[rstest]
    #[case("title")]
    #[case("location")]
    #[case("contact_info")]
    #[case("display_name")]
    #[case("email")]
    fn free_text_columns_are_unbounded(#[case] column: &str) {
        let up_sql = include_str!(
            "../../../migrations/2025-10-17-000000_create_users_and_items/up.sql"
        );
        let declaration = up_sql
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with(&format!("{column} ")))
            .expect("column declared");
        assert!(
            declaration.starts_with(&format!("{column} TEXT ")),
            "{column} must not carry a length limit: {declaration}"
        );
    }

    #[rstest]
    fn unreachable_database_reports_connection_error() {
        let error = apply_blocking("postgres://invalid host/none").expect_err("bad url");
        assert!(matches!(error, MigrationError::Connection { .. }));
    }
}
