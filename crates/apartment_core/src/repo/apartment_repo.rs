//! Apartment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide upsert/delete/lookup APIs over the `apartments` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Writes only accept `Apartment` values, so the stored flag is always
//!   the derived one.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Enumeration order is ascending `id`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::apartment::{Apartment, ApartmentValidationError};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const APARTMENT_SELECT_SQL: &str = "SELECT id, owner, resident, same_flag FROM apartments";

const UPSERT_SQL: &str = "INSERT INTO apartments (id, owner, resident, same_flag)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(id) DO UPDATE SET
        owner = excluded.owner,
        resident = excluded.resident,
        same_flag = excluded.same_flag;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for apartment persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ApartmentValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::Db(err) => err.code(),
            Self::InvalidData(_) => "invalid_data",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingRequiredColumn { .. } => "missing_column",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted apartment data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApartmentValidationError> for RepoError {
    fn from(value: ApartmentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the apartment record store.
pub trait ApartmentRepository {
    /// Inserts the record, or replaces owner/resident/flag of an existing one.
    fn upsert(&self, apartment: &Apartment) -> RepoResult<()>;
    /// Upserts every record in order inside one transaction.
    ///
    /// Returns the number of rows applied. On error nothing is persisted.
    fn upsert_batch(&self, apartments: &[Apartment]) -> RepoResult<usize>;
    /// Removes a record; returns `false` when no such `id` existed.
    fn delete(&self, id: &str) -> RepoResult<bool>;
    fn count(&self) -> RepoResult<u32>;
    /// Record at zero-based `index` in ascending-`id` order.
    fn get_by_position(&self, index: u32) -> RepoResult<Option<Apartment>>;
    fn get_by_id(&self, id: &str) -> RepoResult<Option<Apartment>>;
    /// All records in ascending-`id` order.
    fn list_apartments(&self) -> RepoResult<Vec<Apartment>>;
}

/// SQLite-backed apartment repository.
pub struct SqliteApartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteApartmentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` for foreign schemas.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ApartmentRepository for SqliteApartmentRepository<'_> {
    fn upsert(&self, apartment: &Apartment) -> RepoResult<()> {
        match upsert_row(self.conn, apartment) {
            Ok(()) => {
                debug!(
                    "event=apartment_upsert module=repo status=ok same_flag={}",
                    apartment.same_flag()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=apartment_upsert module=repo status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn upsert_batch(&self, apartments: &[Apartment]) -> RepoResult<usize> {
        let started_at = Instant::now();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        for (index, apartment) in apartments.iter().enumerate() {
            if let Err(err) = upsert_row(&tx, apartment) {
                error!(
                    "event=apartment_batch module=repo status=error row_index={} duration_ms={} error_code={} error={}",
                    index,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                // Dropping `tx` rolls back every row applied so far.
                return Err(err);
            }
        }

        tx.commit()?;
        info!(
            "event=apartment_batch module=repo status=ok rows={} duration_ms={}",
            apartments.len(),
            started_at.elapsed().as_millis()
        );
        Ok(apartments.len())
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM apartments WHERE id = ?1;", [id])?;
        debug!("event=apartment_delete module=repo status=ok removed={}", changed > 0);
        Ok(changed > 0)
    }

    fn count(&self) -> RepoResult<u32> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM apartments;", [], |row| row.get(0))?;
        u32::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("row count `{count}` out of range")))
    }

    fn get_by_position(&self, index: u32) -> RepoResult<Option<Apartment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{APARTMENT_SELECT_SQL} ORDER BY id ASC LIMIT 1 OFFSET ?1;"
        ))?;
        let mut rows = stmt.query([i64::from(index)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_apartment_row(row)?));
        }

        Ok(None)
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<Apartment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APARTMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_apartment_row(row)?));
        }

        Ok(None)
    }

    fn list_apartments(&self) -> RepoResult<Vec<Apartment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APARTMENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut apartments = Vec::new();

        while let Some(row) = rows.next()? {
            apartments.push(parse_apartment_row(row)?);
        }

        Ok(apartments)
    }
}

fn upsert_row(conn: &Connection, apartment: &Apartment) -> RepoResult<()> {
    conn.execute(
        UPSERT_SQL,
        params![
            apartment.id(),
            apartment.owner(),
            apartment.resident(),
            bool_to_int(apartment.same_flag()),
        ],
    )?;
    Ok(())
}

fn parse_apartment_row(row: &Row<'_>) -> RepoResult<Apartment> {
    let id: String = row.get("id")?;
    let owner: String = row.get("owner")?;
    let resident: String = row.get("resident")?;

    let stored_flag = match row.get::<_, i64>("same_flag")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid same_flag value `{other}` for apartment `{id}`"
            )));
        }
    };

    if resident.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty resident stored for apartment `{id}`"
        )));
    }

    let apartment = Apartment::new(id, owner, &resident).map_err(|err| {
        RepoError::InvalidData(format!("stored apartment row failed validation: {err}"))
    })?;
    if apartment.same_flag() != stored_flag {
        return Err(RepoError::InvalidData(format!(
            "stored same_flag disagrees with owner/resident for apartment `{}`",
            apartment.id()
        )));
    }

    Ok(apartment)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'apartments';",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if table_exists.is_none() {
        return Err(RepoError::MissingRequiredTable("apartments"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(apartments);")?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }

    for column in ["id", "owner", "resident", "same_flag"] {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "apartments",
                column,
            });
        }
    }

    Ok(())
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
