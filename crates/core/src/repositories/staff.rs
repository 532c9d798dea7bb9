//! Staff account storage.
//!
//! Passwords arrive here already hashed; hashing and verification live with the HTTP layer.

use crate::db::Database;
use crate::models::{Staff, StaffId};
use crate::{TrackerError, TrackerResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracker_types::NonEmptyText;

#[derive(Clone, Debug)]
pub struct StaffService {
    db: Database,
}

impl StaffService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create an account.
    ///
    /// # Arguments
    ///
    /// * `username` - Unique login name.
    /// * `password_hash` - An already hashed password, see `api_shared::auth::hash_password`.
    /// * `is_staff` - Whether the account may use the staff pages.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidInput` if the username is already taken.
    pub fn create(
        &self,
        username: NonEmptyText,
        password_hash: String,
        is_staff: bool,
    ) -> TrackerResult<Staff> {
        let now = Utc::now();
        let staff = self.db.with_conn(|conn| {
            if find_in(conn, username.as_str())?.is_some() {
                return Err(TrackerError::InvalidInput(format!(
                    "username {username} is already taken"
                )));
            }
            conn.execute(
                "INSERT INTO staff (username, password_hash, is_staff, created_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![username.as_str(), password_hash, is_staff, now],
            )?;
            Ok(Staff {
                id: conn.last_insert_rowid(),
                username,
                password_hash,
                is_staff,
                created_at: now,
            })
        })?;
        tracing::info!(staff_id = staff.id, username = %staff.username, "staff account created");
        Ok(staff)
    }

    /// Look up an account by username. Surrounding whitespace is ignored.
    pub fn find_by_username(&self, username: &str) -> TrackerResult<Option<Staff>> {
        self.db.with_conn(|conn| find_in(conn, username.trim()))
    }

    pub fn get(&self, id: StaffId) -> TrackerResult<Option<Staff>> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, username, password_hash, is_staff, created_at FROM staff WHERE id = ?1",
                params![id],
                read_row,
            )
            .optional()?
            .transpose()
        })
    }

    /// All accounts, ordered by username.
    pub fn list(&self) -> TrackerResult<Vec<Staff>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, password_hash, is_staff, created_at FROM staff ORDER BY username",
            )?;
            let rows = stmt
                .query_map([], read_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().collect()
        })
    }
}

fn find_in(conn: &Connection, username: &str) -> TrackerResult<Option<Staff>> {
    conn.query_row(
        "SELECT id, username, password_hash, is_staff, created_at FROM staff WHERE username = ?1",
        params![username],
        read_row,
    )
    .optional()?
    .transpose()
}

/// Reads a row; the inner result carries domain validation of the stored username.
fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TrackerResult<Staff>> {
    let username: String = row.get("username")?;
    let id = row.get("id")?;
    let password_hash = row.get("password_hash")?;
    let is_staff = row.get("is_staff")?;
    let created_at = row.get("created_at")?;

    Ok(NonEmptyText::new(&username)
        .map_err(|_| TrackerError::InvalidStoredValue {
            field: "username",
            value: username,
        })
        .map(|username| Staff {
            id,
            username,
            password_hash,
            is_staff,
            created_at,
        }))
}
