//! Embedded, versioned schema migrations.

use rusqlite::Connection;
use tracing::info;

use super::{StoreError, StoreResult};

struct Migration {
    version: usize,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "users_and_favorites",
    sql: include_str!("migrations/001_users_and_favorites.sql"),
}];

fn init_migrations_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;
    Ok(())
}

pub fn current_version(conn: &Connection) -> StoreResult<usize> {
    init_migrations_table(conn)?;
    let version = conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
        row.get::<_, Option<i64>>(0)
    })?;
    Ok(version.map_or(0, |v| v as usize))
}

pub fn latest_version() -> usize {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

/// Apply pending migrations in order, each in its own transaction.
/// Returns how many were applied.
pub fn run_migrations(conn: &Connection) -> StoreResult<usize> {
    let current = current_version(conn)?;
    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)
            .map_err(|e| StoreError::Migration(migration.version, e.to_string()))?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            rusqlite::params![migration.version as i64, migration.name],
        )
        .map_err(|e| StoreError::Migration(migration.version, e.to_string()))?;
        tx.commit()
            .map_err(|e| StoreError::Migration(migration.version, e.to_string()))?;
        info!("Applied migration {}: {}", migration.version, migration.name);
        applied += 1;
    }
    Ok(applied)
}
