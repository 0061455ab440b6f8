use crate::backend::Backend;
use crate::error::Result;
use crate::statement::UpdateStatement;
use phonemark_config::DatabaseConfig;
use phonemark_core::Identifier;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, Row};
use tokio::runtime::{Builder, Runtime};

const CHARSET: &str = "utf8mb4";
const COLLATION: &str = "utf8mb4_unicode_ci";

/// MySQL / MariaDB connection driven from synchronous code.
pub struct MySqlBackend {
    runtime: Runtime,
    conn: MySqlConnection,
}

impl MySqlBackend {
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .charset(CHARSET)
            .collation(COLLATION);
        let conn = runtime.block_on(MySqlConnection::connect_with(&options))?;
        Ok(Self { runtime, conn })
    }
}

impl Backend for MySqlBackend {
    fn sample_column(
        &mut self,
        table: &Identifier,
        column: &Identifier,
        limit: usize,
    ) -> Result<Vec<String>> {
        let sql = format!("SELECT {column} FROM {table} LIMIT ?");
        let conn = &mut self.conn;
        let rows = self.runtime.block_on(async {
            sqlx::query(&sql)
                .bind(limit as u64)
                .fetch_all(&mut *conn)
                .await
        })?;
        Ok(rows.iter().map(row_text).collect())
    }

    fn execute_update(&mut self, statement: &UpdateStatement) -> Result<u64> {
        let conn = &mut self.conn;
        let affected = self.runtime.block_on(async {
            let mut tx = conn.begin().await?;
            let mut query = sqlx::query(&statement.sql);
            for param in &statement.params {
                query = query.bind(param.as_str());
            }
            let done = query.execute(&mut *tx).await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(done.rows_affected())
        })?;
        Ok(affected)
    }

    fn close(self) -> Result<()> {
        let Self { runtime, conn } = self;
        runtime.block_on(conn.close())?;
        Ok(())
    }
}

fn row_text(row: &MySqlRow) -> String {
    if let Ok(value) = row.try_get::<Option<String>, _>(0) {
        return value.unwrap_or_else(|| "NULL".to_string());
    }
    if let Ok(Some(value)) = row.try_get::<Option<i64>, _>(0) {
        return value.to_string();
    }
    if let Ok(Some(value)) = row.try_get::<Option<u64>, _>(0) {
        return value.to_string();
    }
    "<unreadable>".to_string()
}
