pub mod backend;
pub mod error;
pub mod statement;

pub use backend::{build_and_execute, Backend, Database, SqliteBackend};
pub use error::{Result, StoreError};
pub use statement::{Dialect, UpdateStatement};
