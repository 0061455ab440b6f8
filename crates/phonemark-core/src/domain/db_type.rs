use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Sqlite,
    Mysql,
    Mariadb,
}

impl DbType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbType::Sqlite => "sqlite",
            DbType::Mysql => "mysql",
            DbType::Mariadb => "mariadb",
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, DbType::Mysql | DbType::Mariadb)
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(DbType::Sqlite),
            "mysql" => Ok(DbType::Mysql),
            "mariadb" => Ok(DbType::Mariadb),
            other => Err(format!("unsupported database type: {other}")),
        }
    }
}
