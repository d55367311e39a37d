use apartment_core::db::migrations::latest_version;
use apartment_core::db::open_db_in_memory;
use apartment_core::{
    Apartment, ApartmentDraft, ApartmentRepository, ApartmentService, ApartmentValidationError,
    RepoError, SqliteApartmentRepository,
};
use rusqlite::Connection;

fn apartment(id: &str, owner: &str, resident: &str) -> Apartment {
    Apartment::new(id, owner, resident).unwrap()
}

fn snapshot(repo: &SqliteApartmentRepository<'_>) -> Vec<Apartment> {
    repo.list_apartments().unwrap()
}

#[test]
fn upsert_inserts_then_replaces() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteApartmentRepository::try_new(&conn).unwrap();

    repo.upsert(&apartment("A-1", "Alice", "Alice")).unwrap();
    repo.upsert(&apartment("A-1", "Alice", "Bob")).unwrap();

    assert_eq!(repo.count().unwrap(), 1);
    let loaded = repo.get_by_id("A-1").unwrap().unwrap();
    assert_eq!(loaded.owner(), "Alice");
    assert_eq!(loaded.resident(), "Bob");
    assert!(!loaded.same_flag());
}

#[test]
fn upsert_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteApartmentRepository::try_new(&conn).unwrap();
    let record = apartment("A-1", "Alice", "Alice");

    repo.upsert(&record).unwrap();
    let once = snapshot(&repo);
    repo.upsert(&record).unwrap();

    assert_eq!(snapshot(&repo), once);
    assert_eq!(once, vec![record]);
}

#[test]
fn empty_resident_is_stored_as_vacant() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteApartmentRepository::try_new(&conn).unwrap();

    repo.upsert(&apartment("A-1", "Alice", "")).unwrap();

    let stored: String = conn
        .query_row("SELECT resident FROM apartments WHERE id = 'A-1';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(stored, "Vacant");
}

#[test]
fn stored_flag_is_recomputed_on_every_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteApartmentRepository::try_new(&conn).unwrap();

    repo.upsert(&apartment("A-1", "Alice", "Alice")).unwrap();
    repo.upsert(&apartment("A-1", "", "")).unwrap();

    let flag: i64 = conn
        .query_row("SELECT same_flag FROM apartments WHERE id = 'A-1';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(flag, 0);
}

#[test]
fn positional_access_follows_ascending_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteApartmentRepository::try_new(&conn).unwrap();

    for id in ["C-3", "A-1", "B-2", "B-10"] {
        repo.upsert(&apartment(id, "Owner", "")).unwrap();
    }

    let count = repo.count().unwrap();
    let ids: Vec<String> = (0..count)
        .map(|index| repo.get_by_position(index).unwrap().unwrap().id().to_string())
        .collect();
    assert_eq!(ids, ["A-1", "B-10", "B-2", "C-3"]);
    assert!(repo.get_by_position(count).unwrap().is_none());
}

#[test]
fn delete_missing_id_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteApartmentRepository::try_new(&conn).unwrap();
    repo.upsert(&apartment("A-1", "Alice", "Alice")).unwrap();

    assert!(!repo.delete("Z-9").unwrap());
    assert_eq!(repo.count().unwrap(), 1);

    assert!(repo.delete("A-1").unwrap());
    assert_eq!(repo.count().unwrap(), 0);
    assert!(repo.get_by_id("A-1").unwrap().is_none());
}

#[test]
fn upsert_batch_rolls_back_on_mid_batch_failure() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_boom BEFORE INSERT ON apartments
         WHEN NEW.id = 'BOOM'
         BEGIN SELECT RAISE(ABORT, 'boom rejected'); END;",
    )
    .unwrap();
    let repo = SqliteApartmentRepository::try_new(&conn).unwrap();
    repo.upsert(&apartment("A-1", "Alice", "Alice")).unwrap();
    let before = snapshot(&repo);

    let batch = [
        apartment("A-1", "Zed", "Zed"),
        apartment("B-2", "Bob", ""),
        apartment("BOOM", "X", "X"),
        apartment("C-3", "Carol", "Carol"),
    ];
    let err = repo.upsert_batch(&batch).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    assert_eq!(snapshot(&repo), before);
}

#[test]
fn read_path_rejects_inconsistent_flag() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO apartments (id, owner, resident, same_flag) VALUES ('A-1', 'Alice', 'Bob', 1);",
        [],
    )
    .unwrap();
    let repo = SqliteApartmentRepository::try_new(&conn).unwrap();

    let err = repo.get_by_id("A-1").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteApartmentRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE apartments (id TEXT PRIMARY KEY, owner TEXT NOT NULL, resident TEXT NOT NULL);",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteApartmentRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "apartments",
            column: "same_flag"
        })
    ));
}

#[test]
fn service_save_validates_and_normalizes_drafts() {
    let conn = open_db_in_memory().unwrap();
    let service = ApartmentService::new(SqliteApartmentRepository::try_new(&conn).unwrap());

    let err = service
        .save(&ApartmentDraft::new("", "Alice", "Alice"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ApartmentValidationError::EmptyId)
    ));
    assert_eq!(service.count().unwrap(), 0);

    let saved = service
        .save(&ApartmentDraft::new("A-1", "Vacant", ""))
        .unwrap();
    assert_eq!(saved.resident(), "Vacant");
    assert!(saved.same_flag());
    assert_eq!(service.get_by_position(0).unwrap(), Some(saved.clone()));

    let mut draft = ApartmentDraft::from_apartment(&saved);
    draft.resident = "Dana".to_string();
    service.save(&draft).unwrap();
    assert_eq!(service.list().unwrap()[0].resident(), "Dana");
}
