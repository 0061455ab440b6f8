#[cfg(feature = "mysql")]
pub mod mysql;
pub mod sqlite;

#[cfg(feature = "mysql")]
pub use mysql::MySqlBackend;
pub use sqlite::SqliteBackend;

use crate::error::Result;
use crate::statement::{Dialect, UpdateStatement};
use phonemark_config::DatabaseConfig;
use phonemark_core::{DbType, Identifier, UpdateRequest};
use std::path::Path;
use tracing::{debug, warn};

/// The slice of a database driver the updater needs.
pub trait Backend {
    /// First `limit` stored values of `column`, rendered as text.
    fn sample_column(
        &mut self,
        table: &Identifier,
        column: &Identifier,
        limit: usize,
    ) -> Result<Vec<String>>;

    /// Runs one statement in its own transaction and commits it.
    fn execute_update(&mut self, statement: &UpdateStatement) -> Result<u64>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Connection for whichever engine the settings name.
pub enum Database {
    Sqlite(SqliteBackend),
    #[cfg(feature = "mysql")]
    MySql(MySqlBackend),
}

impl Database {
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        match config.db_type {
            DbType::Sqlite => {
                debug!(path = %config.database, "opening sqlite database");
                Ok(Database::Sqlite(SqliteBackend::open(Path::new(
                    &config.database,
                ))?))
            }
            #[cfg(feature = "mysql")]
            DbType::Mysql | DbType::Mariadb => {
                debug!(
                    host = %config.host,
                    port = config.port,
                    database = %config.database,
                    "connecting to {}",
                    config.db_type
                );
                Ok(Database::MySql(MySqlBackend::connect(config)?))
            }
            #[cfg(not(feature = "mysql"))]
            other => Err(crate::error::StoreError::Unsupported(other)),
        }
    }
}

impl Backend for Database {
    fn sample_column(
        &mut self,
        table: &Identifier,
        column: &Identifier,
        limit: usize,
    ) -> Result<Vec<String>> {
        match self {
            Database::Sqlite(backend) => backend.sample_column(table, column, limit),
            #[cfg(feature = "mysql")]
            Database::MySql(backend) => backend.sample_column(table, column, limit),
        }
    }

    fn execute_update(&mut self, statement: &UpdateStatement) -> Result<u64> {
        match self {
            Database::Sqlite(backend) => backend.execute_update(statement),
            #[cfg(feature = "mysql")]
            Database::MySql(backend) => backend.execute_update(statement),
        }
    }

    fn close(self) -> Result<()> {
        match self {
            Database::Sqlite(backend) => backend.close(),
            #[cfg(feature = "mysql")]
            Database::MySql(backend) => backend.close(),
        }
    }
}

/// Builds the single `UPDATE` for `request`, runs it and releases the connection.
///
/// Validation happens before anything reaches the backend, so a rejected
/// request never issues a statement. The backend is closed on every path; a
/// close failure after the commit is logged and the affected count still
/// returned. Zero affected rows is a successful result.
pub fn build_and_execute<B: Backend>(
    mut backend: B,
    dialect: Dialect,
    request: &UpdateRequest,
) -> Result<u64> {
    let statement = match dialect.build(request) {
        Ok(statement) => statement,
        Err(err) => {
            release(backend);
            return Err(err);
        }
    };
    debug!(
        sql = %statement.sql,
        params = statement.params.len(),
        "executing update"
    );

    // The update is committed once execute_update returns, so a failed close
    // is only logged.
    let outcome = backend.execute_update(&statement);
    release(backend);
    outcome
}

fn release<B: Backend>(backend: B) {
    if let Err(err) = backend.close() {
        warn!(error = %err, "failed to close database connection");
    }
}
