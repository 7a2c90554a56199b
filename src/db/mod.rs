//! SQLite persistence for users and favorites.
//!
//! Connections come from an r2d2 pool; every connection enables foreign keys
//! so favorites are removed together with their owner.

pub mod favorites;
pub mod migrations;
pub mod users;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;
use tracing::info;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 4;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("migration {0} failed: {1}")]
    Migration(usize, String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Open (creating if needed) the database file and bring the schema up to date.
pub fn init_pool(db_path: &str) -> StoreResult<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;
    let applied = migrations::run_migrations(&*get_conn(&pool)?)?;
    info!("Database ready at {} ({} migrations applied)", db_path, applied);
    Ok(pool)
}

/// In-memory database for tests and tooling.
///
/// Every SQLite memory connection is its own database, so the pool holds a
/// single connection. Callers must release it before asking for another.
pub fn init_memory_pool() -> StoreResult<DbPool> {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder().max_size(1).build(manager)?;
    migrations::run_migrations(&*get_conn(&pool)?)?;
    Ok(pool)
}

pub fn get_conn(pool: &DbPool) -> StoreResult<PooledConnection> {
    Ok(pool.get()?)
}

/// True when `e` is a UNIQUE/PRIMARY KEY violation.
pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
                && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}
