//! The key/value settings layer the banner configuration is persisted in
//!
//! The primary entry point to this module is the function [get_store_from_env], which returns an
//! object implementing the [SettingsStore] trait. This object can be shared between threads in a
//! global application state and be used to create [SettingsStoreFacade] instances for interaction
//! with the database.
//!
//! Settings are plain string values, addressed by a module id (namespace) and a setting name. A
//! setting that has never been written is simply absent; typing and default values are the
//! business of the module owning the namespace (see [crate::banner::configuration]).
//!
//! The primary implementation of [SettingsStore] ([postgres::PgSettingsStore]) wraps a PostgreSQL
//! connection pool. There is also a mock implementation for unittests.

use crate::cli_error::CliError;
use crate::setup;

mod postgres;
mod schema;
#[cfg(test)]
pub mod store_mock;

/// Get a [SettingsStore] instance, according to the "DATABASE_URL" environment variable.
///
/// The DATABASE_URL must be a PostgreSQL connection url, following the schema
/// "postgres://{user}:{password}@{host}/{database}".
pub fn get_store_from_env() -> Result<impl SettingsStore, CliError> {
    postgres::PgSettingsStore::new(&setup::get_database_url_from_env()?)
        .map_err(|err| CliError::UnexpectedStoreError(err.to_string()))
}

pub trait SettingsStoreFacade {
    /// Get the raw value of a single setting.
    ///
    /// Returns `Ok(None)` if the setting has never been written or has been stored as NULL.
    fn get_setting(&mut self, module_id: &str, name: &str) -> Result<Option<String>, StoreError>;

    /// Get all settings of the given module namespace, sorted by name.
    fn get_settings(&mut self, module_id: &str) -> Result<Vec<(String, String)>, StoreError>;

    /// Write multiple settings of one module namespace at once.
    ///
    /// Either all values are written or none of them: subsequent reads never observe a partially
    /// applied update.
    fn set_settings(&mut self, module_id: &str, values: &[(&str, String)])
        -> Result<(), StoreError>;
}

pub trait SettingsStore: Send + Sync {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn SettingsStoreFacade + 'a>, StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    /// Connection the database failed. See string description for details.
    ConnectionError(String),
    /// The query could not be executed because of some error not covered by the other members (see
    /// string description)
    QueryError(diesel::result::Error),
    /// Database transaction could not be commited due to a conflicting concurrent transaction
    TransactionConflict,
    /// Some data queried from the database could not be deserialized. See string description for
    /// details.
    InvalidDataInDatabase(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::SerializationFailure,
                _,
            ) => Self::TransactionConflict,
            diesel::result::Error::DeserializationError(e) => {
                Self::InvalidDataInDatabase(e.to_string())
            }
            _ => Self::QueryError(error),
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(error: r2d2::Error) -> Self {
        Self::ConnectionError(error.to_string())
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Error connecting to database: {}", e),
            Self::QueryError(e) => write!(f, "Error while executing database query: {}", e),
            Self::TransactionConflict => f.write_str(
                "Database transaction could not be commited due to a conflicting concurrent transaction",
            ),
            Self::InvalidDataInDatabase(e) => {
                write!(f, "Data queried from database could not be deserialized: {}", e)
            }
        }
    }
}

impl std::error::Error for StoreError {}
