use kindieval_core::db::migrations::{latest_version, schema_version};
use kindieval_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "targets");
    assert_table_exists(&conn, "children");
    assert_table_exists(&conn, "assessments");
    assert_table_exists(&conn, "assessment_records");
    assert_index_exists(&conn, "idx_targets_age_band");
    assert_index_exists(&conn, "idx_assessments_child");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kindieval.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    assert_table_exists(&conn_second, "targets");
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
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn targets_age_band_check_rejects_unknown_values() {
    let conn = open_db_in_memory().unwrap();
    let err = conn.execute(
        "INSERT INTO targets (uuid, code, age_band, domain, content)
         VALUES ('00000000-0000-4000-8000-000000000001', 'X', 'age_9_10', 'physical', 'x');",
        [],
    );
    assert!(err.is_err());
}

#[test]
fn children_age_band_check_rejects_unknown_values() {
    let conn = open_db_in_memory().unwrap();
    let insert = |age_band: &str| {
        conn.execute(
            "INSERT INTO children (uuid, name, birth_date, class_label, age_band, teacher)
             VALUES (?1, 'An', '2020-05-12', 'Mầm 1', ?2, 'Cô Lan');",
            [uuid::Uuid::new_v4().to_string().as_str(), age_band],
        )
    };
    assert!(insert("age_3_4").is_ok());
    assert!(insert("3-4 tuổi").is_err());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
