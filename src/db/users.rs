use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{is_unique_violation, StoreError, StoreResult};
use crate::models::User;

pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, name, created_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        name: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Emails are stored lowercased so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn create_user(conn: &Connection, new: NewUser<'_>) -> StoreResult<User> {
    let email = normalize_email(new.email);
    let name = match (new.first_name, new.last_name) {
        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
        (Some(first), None) => Some(first.to_string()),
        (None, Some(last)) => Some(last.to_string()),
        (None, None) => None,
    };
    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash: new.password_hash.to_string(),
        first_name: new.first_name.map(str::to_string),
        last_name: new.last_name.map(str::to_string),
        name,
        created_at: Utc::now(),
    };

    conn.execute(
        "INSERT INTO users (id, email, password_hash, first_name, last_name, name, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            user.id,
            user.email,
            user.password_hash,
            user.first_name,
            user.last_name,
            user.name,
            user.created_at,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::Duplicate(format!("User '{}' already exists", user.email))
        } else {
            StoreError::Sqlite(e)
        }
    })?;

    Ok(user)
}

pub fn get_user(conn: &Connection, id: &str) -> StoreResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_user).optional()?)
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> StoreResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
    Ok(conn
        .query_row(&sql, [normalize_email(email)], map_user)
        .optional()?)
}

pub fn delete_user(conn: &Connection, id: &str) -> StoreResult<bool> {
    let rows = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
    Ok(rows > 0)
}
