use phonemark_core::{CoreError, DbType, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[cfg(feature = "mysql")]
    #[error("mysql error: {0}")]
    MySql(#[from] sqlx::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("database type {0} is not supported by this build")]
    Unsupported(DbType),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Core(err) => err.kind(),
            StoreError::Unsupported(_) => ErrorKind::Config,
            StoreError::Io(_) | StoreError::Sql(_) => ErrorKind::Query,
            #[cfg(feature = "mysql")]
            StoreError::MySql(_) => ErrorKind::Query,
        }
    }
}
