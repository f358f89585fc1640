use rusqlite::Connection;
use userbook_core::db::migrations::latest_version;
use userbook_core::db::{open_db, open_db_in_memory, DbError};
use userbook_core::{SqliteUserRepository, UserFields, UserRepository, UserService};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "users");
    assert_table_exists(&conn, "contacts");
    assert_table_exists(&conn, "user_contacts");
}

#[test]
fn reopening_database_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("userbook.db");

    let conn_first = open_db(&path).unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn_first).unwrap());
    let created = service
        .create_user(&UserFields::new("arun", "kumar"))
        .unwrap();
    drop(service);
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqliteUserRepository::try_new(&conn_second).unwrap();
    let reloaded = repo.get_user(created.id).unwrap().unwrap();
    assert_eq!(reloaded, created);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_failure_names_the_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("userbook.db");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Open { path: ref failed, .. } if *failed == path));
    assert!(err.to_string().contains("userbook.db"));
}

#[test]
fn foreign_keys_are_enabled() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
