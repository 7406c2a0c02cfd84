//! This module uses the embedded Diesel migration data to provide functions for checking the
//! database migration status and migrating the database schema to the current state.
//!
//! The functions provided functions are meant to be used directly from the command line interface
//! implementation.
use crate::cli_error::CliError;
use crate::setup::get_database_url_from_env;
use diesel::migration::Migration;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgresql");

/// Migrate the database schema to the latest known migration for the current application version.
///
/// The database connection URL is taken from the environment variable, using
/// [get_database_url_from_env]. Information about the migration process is printed to stdout.
pub fn run_migrations() -> Result<(), CliError> {
    let mut connection = diesel::pg::PgConnection::establish(&get_database_url_from_env()?)?;
    let mut connection =
        diesel_migrations::HarnessWithOutput::new(&mut connection, std::io::stdout());
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| CliError::DatabaseMigrationError(e.to_string()))?;

    Ok(())
}

/// Check if the database schema has been migrated to the latest known migration for the current
/// application version. If not, return an error, listing the missing migrations.
///
/// The database connection URL is taken from the environment variable, using
/// [get_database_url_from_env].
pub fn check_migration_state() -> Result<(), CliError> {
    let mut connection = diesel::pg::PgConnection::establish(&get_database_url_from_env()?)?;
    let pending_migrations = connection
        .pending_migrations(MIGRATIONS)
        .map_err(|e| CliError::DatabaseMigrationError(e.to_string()))?;
    if !pending_migrations.is_empty() {
        return Err(CliError::DatabaseMigrationRequired {
            missing_migrations: pending_migrations
                .iter()
                .map(|m| m.name().to_string())
                .collect(),
        });
    }
    Ok(())
}
