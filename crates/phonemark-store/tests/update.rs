use phonemark_config::AppConfig;
use phonemark_core::{ErrorKind, Identifier, PhoneNumber, UpdateRequest};
use phonemark_store::{
    build_and_execute, Backend, Database, Dialect, SqliteBackend, StoreError, UpdateStatement,
};
use rusqlite::Connection;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

#[derive(Debug, Default)]
struct Log {
    statements: Vec<UpdateStatement>,
    closed: bool,
}

struct RecordingBackend {
    log: Rc<RefCell<Log>>,
    affected: u64,
    fail: bool,
    fail_close: bool,
}

impl RecordingBackend {
    fn new(affected: u64) -> (Self, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let backend = Self {
            log: Rc::clone(&log),
            affected,
            fail: false,
            fail_close: false,
        };
        (backend, log)
    }
}

impl Backend for RecordingBackend {
    fn sample_column(
        &mut self,
        _table: &Identifier,
        _column: &Identifier,
        _limit: usize,
    ) -> phonemark_store::Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn execute_update(&mut self, statement: &UpdateStatement) -> phonemark_store::Result<u64> {
        self.log.borrow_mut().statements.push(statement.clone());
        if self.fail {
            return Err(StoreError::Sql(rusqlite::Error::QueryReturnedNoRows));
        }
        Ok(self.affected)
    }

    fn close(self) -> phonemark_store::Result<()> {
        self.log.borrow_mut().closed = true;
        if self.fail_close {
            return Err(StoreError::Io(std::io::Error::other("connection reset")));
        }
        Ok(())
    }
}

fn request(phones: &[&str]) -> UpdateRequest {
    UpdateRequest {
        table: "users".to_string(),
        phone_column: "phone_number".to_string(),
        update_column: "status".to_string(),
        update_value: "contacted".to_string(),
        phones: phones
            .iter()
            .map(|raw| PhoneNumber::parse(raw).expect("phone"))
            .collect(),
    }
}

#[test]
fn parameterized_update_sends_one_statement_in_sheet_order() {
    let (backend, log) = RecordingBackend::new(2);
    let affected = build_and_execute(
        backend,
        Dialect::Parameterized,
        &request(&["010-9999-0000", "01011112222"]),
    )
    .expect("update");
    assert_eq!(affected, 2);

    let log = log.borrow();
    assert!(log.closed);
    assert_eq!(log.statements.len(), 1);
    let statement = &log.statements[0];
    assert_eq!(statement.clause_count, 4);
    assert_eq!(
        statement.params,
        vec![
            "contacted",
            "01099990000",
            "010-9999-0000",
            "01011112222",
            "010-1111-2222",
        ]
    );
}

#[test]
fn zero_matches_is_not_an_error() {
    let (backend, log) = RecordingBackend::new(0);
    let affected =
        build_and_execute(backend, Dialect::InlineLiteral, &request(&["01011112222"]))
            .expect("update");
    assert_eq!(affected, 0);
    assert!(log.borrow().closed);
}

#[test]
fn empty_phone_set_sends_nothing() {
    let (backend, log) = RecordingBackend::new(1);
    let err = build_and_execute(backend, Dialect::Parameterized, &request(&[])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoPhoneNumbersFound);

    let log = log.borrow();
    assert!(log.statements.is_empty());
    assert!(log.closed);
}

#[test]
fn unsafe_table_names_send_nothing() {
    for table in ["users;", "users x", "users\tx", "", " users", "users\n"] {
        let (backend, log) = RecordingBackend::new(1);
        let mut request = request(&["01011112222"]);
        request.table = table.to_string();
        let err = build_and_execute(backend, Dialect::InlineLiteral, &request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "table {table:?}");
        assert!(log.borrow().statements.is_empty());
    }
}

#[test]
fn failed_statement_still_releases_connection() {
    let (mut backend, log) = RecordingBackend::new(1);
    backend.fail = true;
    let err =
        build_and_execute(backend, Dialect::Parameterized, &request(&["01011112222"]))
            .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Query);

    let log = log.borrow();
    assert_eq!(log.statements.len(), 1);
    assert!(log.closed);
}

#[test]
fn close_failure_after_commit_keeps_the_count() {
    let (mut backend, log) = RecordingBackend::new(3);
    backend.fail_close = true;
    let affected =
        build_and_execute(backend, Dialect::Parameterized, &request(&["01011112222"]))
            .expect("update");
    assert_eq!(affected, 3);
    assert!(log.borrow().closed);
}

fn seed(path: &Path) {
    let conn = Connection::open(path).expect("create db");
    conn.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, phone_number TEXT, status TEXT);
         INSERT INTO users (phone_number, status) VALUES ('010-1234-5678', 'new');
         INSERT INTO users (phone_number, status) VALUES ('0212345678', 'new');
         INSERT INTO users (phone_number, status) VALUES ('010-5555-0000', 'new');
         INSERT INTO users (phone_number, status) VALUES ('it''s', 'new');",
    )
    .expect("seed");
}

fn statuses(path: &Path) -> Vec<(String, String)> {
    let conn = Connection::open(path).expect("reopen");
    let mut stmt = conn
        .prepare("SELECT phone_number, status FROM users ORDER BY id")
        .expect("prepare");
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .expect("query");
    rows.collect::<Result<Vec<_>, _>>().expect("rows")
}

#[test]
fn sqlite_round_trip_matches_hyphenated_rows_only() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("crm.db");
    seed(&db_path);

    let backend = SqliteBackend::open(&db_path).expect("open");
    let affected = build_and_execute(
        backend,
        Dialect::InlineLiteral,
        &request(&["+82 10 1234 5678", "021-234-5678", "010'5555'0001"]),
    )
    .expect("update");
    assert_eq!(affected, 2);

    let rows = statuses(&db_path);
    assert_eq!(rows[0], ("010-1234-5678".to_string(), "contacted".to_string()));
    assert_eq!(rows[1], ("0212345678".to_string(), "contacted".to_string()));
    assert_eq!(rows[2], ("010-5555-0000".to_string(), "new".to_string()));
    assert_eq!(rows[3], ("it's".to_string(), "new".to_string()));
}

#[test]
fn sqlite_parameterized_dialect_matches_the_same_rows() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("crm.db");
    seed(&db_path);

    let backend = SqliteBackend::open(&db_path).expect("open");
    let affected =
        build_and_execute(backend, Dialect::Parameterized, &request(&["01012345678"]))
            .expect("update");
    assert_eq!(affected, 1);
    assert_eq!(statuses(&db_path)[0].1, "contacted");
}

#[test]
fn sqlite_accepts_thousands_of_numbers_in_one_statement() {
    let phones: Vec<String> = (0..2000).map(|n| format!("010{n:08}")).collect();
    let phones: Vec<&str> = phones.iter().map(String::as_str).collect();

    for dialect in [Dialect::InlineLiteral, Dialect::Parameterized] {
        let temp = TempDir::new().expect("temp dir");
        let db_path = temp.path().join("crm.db");
        let conn = Connection::open(&db_path).expect("create db");
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, phone_number TEXT, status TEXT);
             INSERT INTO users (phone_number, status) VALUES ('010-0000-1999', 'new');
             INSERT INTO users (phone_number, status) VALUES ('01000000000', 'new');
             INSERT INTO users (phone_number, status) VALUES ('010-0000-2000', 'new');",
        )
        .expect("seed");
        drop(conn);

        let backend = SqliteBackend::open(&db_path).expect("open");
        let affected = build_and_execute(backend, dialect, &request(&phones))
            .unwrap_or_else(|err| panic!("{dialect:?}: {err}"));
        assert_eq!(affected, 2, "{dialect:?}");

        let rows = statuses(&db_path);
        assert_eq!(rows[0].1, "contacted");
        assert_eq!(rows[1].1, "contacted");
        assert_eq!(rows[2].1, "new");
    }
}

#[test]
fn database_opens_sqlite_from_settings() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("crm.db");
    seed(&db_path);

    let mut config = AppConfig::default();
    config.database.database = db_path.display().to_string();
    let mut database = Database::open(&config.database).expect("open");

    let table = Identifier::parse("table", "users").unwrap();
    let column = Identifier::parse("column", "phone_number").unwrap();
    let samples = database.sample_column(&table, &column, 5).expect("sample");
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0], "010-1234-5678");

    let affected =
        build_and_execute(database, Dialect::InlineLiteral, &request(&["01099998888"]))
            .expect("update");
    assert_eq!(affected, 0);
}

#[test]
fn missing_sqlite_file_is_not_created() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("missing.db");
    assert!(SqliteBackend::open(&db_path).is_err());
    assert!(!db_path.exists());
}
