use crate::backend::Backend;
use crate::error::Result;
use crate::statement::UpdateStatement;
use phonemark_core::Identifier;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::path::Path;

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens an existing database file; a missing file is an error, not a new database.
    pub fn open(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "busy_timeout", 2000)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Backend for SqliteBackend {
    fn sample_column(
        &mut self,
        table: &Identifier,
        column: &Identifier,
        limit: usize,
    ) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {column} FROM {table} LIMIT ?1"))?;
        let rows = stmt.query_map([limit as i64], |row| row.get::<_, Value>(0))?;
        let mut values = Vec::new();
        for value in rows {
            values.push(value_text(value?));
        }
        Ok(values)
    }

    fn execute_update(&mut self, statement: &UpdateStatement) -> Result<u64> {
        let tx = self.conn.transaction()?;
        let affected = tx.execute(&statement.sql, params_from_iter(statement.params.iter()))?;
        tx.commit()?;
        Ok(affected as u64)
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| err.into())
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(value) => value.to_string(),
        Value::Real(value) => value.to_string(),
        Value::Text(value) => value,
        Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteBackend;
    use crate::backend::Backend;
    use crate::statement::UpdateStatement;
    use phonemark_core::Identifier;
    use rusqlite::Connection;

    fn backend() -> SqliteBackend {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch(
            "CREATE TABLE users (phone_number TEXT, status TEXT);
             INSERT INTO users VALUES ('010-1234-5678', NULL);
             INSERT INTO users VALUES (NULL, NULL);
             INSERT INTO users VALUES ('01099998888', 'old');",
        )
        .expect("seed");
        SqliteBackend::from_connection(conn).expect("backend")
    }

    #[test]
    fn sample_column_renders_values() {
        let mut backend = backend();
        let table = Identifier::parse("table", "users").unwrap();
        let column = Identifier::parse("column", "phone_number").unwrap();
        let values = backend.sample_column(&table, &column, 2).expect("sample");
        assert_eq!(values, vec!["010-1234-5678", "NULL"]);
    }

    #[test]
    fn execute_update_reports_affected_rows() {
        let mut backend = backend();
        let statement = UpdateStatement {
            sql: "UPDATE users SET status = ? WHERE phone_number = '010-1234-5678'".to_string(),
            params: vec!["done".to_string()],
            clause_count: 1,
        };
        assert_eq!(backend.execute_update(&statement).expect("update"), 1);

        let status: String = backend
            .connection()
            .query_row(
                "SELECT status FROM users WHERE phone_number = '010-1234-5678'",
                [],
                |row| row.get(0),
            )
            .expect("status");
        assert_eq!(status, "done");
    }

    #[test]
    fn failed_update_leaves_rows_untouched() {
        let mut backend = backend();
        let statement = UpdateStatement {
            sql: "UPDATE users SET missing = ? WHERE phone_number = '01099998888'".to_string(),
            params: vec!["done".to_string()],
            clause_count: 1,
        };
        assert!(backend.execute_update(&statement).is_err());

        let status: String = backend
            .connection()
            .query_row(
                "SELECT status FROM users WHERE phone_number = '01099998888'",
                [],
                |row| row.get(0),
            )
            .expect("status");
        assert_eq!(status, "old");
    }
}
