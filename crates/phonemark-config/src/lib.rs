use std::env;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use phonemark_core::DbType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR: &str = "phonemark";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_MYSQL_PORT: u16 = 3306;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sheet: SheetConfig,
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub db_type: DbType,
    /// SQLite file path, or the schema name on MySQL / MariaDB.
    pub database: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub table: String,
    pub phone_column: String,
    pub update_column: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetConfig {
    /// Zero-based index of the column holding phone numbers.
    pub phone_column_index: usize,
    /// Zero-based header row, or the number of rows to skip without a header.
    pub start_row: usize,
    pub has_header: bool,
}

impl SheetConfig {
    pub fn header_row(&self) -> Option<usize> {
        self.has_header.then_some(self.start_row)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("db_type", &self.db_type)
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("table", &self.table)
            .field("phone_column", &self.phone_column)
            .field("update_column", &self.update_column)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                db_type: DbType::Sqlite,
                database: "mydatabase.db".to_string(),
                host: "localhost".to_string(),
                port: DEFAULT_MYSQL_PORT,
                user: "username".to_string(),
                password: "password".to_string(),
                table: "users".to_string(),
                phone_column: "phone_number".to_string(),
                update_column: "status".to_string(),
            },
            sheet: SheetConfig {
                phone_column_index: 1,
                start_row: 1,
                has_header: true,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("config file already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("invalid database port: {0}")]
    InvalidPort(u16),
    #[error("database name is required")]
    EmptyDatabase,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<DatabaseFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sheet: Option<SheetFile>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct DatabaseFile {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    db_type: Option<DbType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    update_column: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct SheetFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_column_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_header: Option<bool>,
}

impl From<&AppConfig> for ConfigFile {
    fn from(config: &AppConfig) -> Self {
        let db = &config.database;
        Self {
            database: Some(DatabaseFile {
                db_type: Some(db.db_type),
                database: Some(db.database.clone()),
                host: Some(db.host.clone()),
                port: Some(db.port),
                user: Some(db.user.clone()),
                password: Some(db.password.clone()),
                table: Some(db.table.clone()),
                phone_column: Some(db.phone_column.clone()),
                update_column: Some(db.update_column.clone()),
            }),
            sheet: Some(SheetFile {
                phone_column_index: Some(config.sheet.phone_column_index),
                start_row: Some(config.sheet.start_row),
                has_header: Some(config.sheet.has_header),
            }),
        }
    }
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

/// Writes the built-in defaults to `path`, readable by the owner only.
pub fn write_default(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let contents = toml::to_string_pretty(&ConfigFile::from(&AppConfig::default()))?;
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut file = open_private(path).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    restrict_permissions(path).map_err(write_err)?;
    Ok(())
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(database) = parsed.database {
        let target = &mut config.database;
        if let Some(db_type) = database.db_type {
            target.db_type = db_type;
        }
        if let Some(name) = database.database {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyDatabase);
            }
            target.database = name;
        }
        if let Some(host) = database.host {
            target.host = host;
        }
        if let Some(port) = database.port {
            if port == 0 {
                return Err(ConfigError::InvalidPort(port));
            }
            target.port = port;
        }
        if let Some(user) = database.user {
            target.user = user;
        }
        if let Some(password) = database.password {
            target.password = password;
        }
        if let Some(table) = database.table {
            target.table = table;
        }
        if let Some(column) = database.phone_column {
            target.phone_column = column;
        }
        if let Some(column) = database.update_column {
            target.update_column = column;
        }
    }

    if let Some(sheet) = parsed.sheet {
        if let Some(index) = sheet.phone_column_index {
            config.sheet.phone_column_index = index;
        }
        if let Some(start_row) = sheet.start_row {
            config.sheet.start_row = start_row;
        }
        if let Some(has_header) = sheet.has_header {
            config.sheet.has_header = has_header;
        }
    }

    Ok(config)
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
