use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{is_unique_violation, StoreError, StoreResult};
use crate::models::Favorite;

pub const DUPLICATE_MESSAGE: &str = "Já está na lista de favoritos";
pub const MISSING_MESSAGE: &str = "Favorito não encontrado";

#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub content_id: String,
    pub content_type: String,
    pub title: String,
    pub poster: Option<String>,
    pub year: Option<String>,
    pub rating: Option<String>,
}

const FAVORITE_COLUMNS: &str =
    "id, user_id, content_id, content_type, title, poster, year, rating, added_at";

fn map_favorite(row: &Row<'_>) -> rusqlite::Result<Favorite> {
    Ok(Favorite {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content_id: row.get(2)?,
        content_type: row.get(3)?,
        title: row.get(4)?,
        poster: row.get(5)?,
        year: row.get(6)?,
        rating: row.get(7)?,
        added_at: row.get(8)?,
    })
}

/// Newest first; rowid breaks ties between rows added in the same instant.
pub fn list_favorites(conn: &Connection, user_id: &str) -> StoreResult<Vec<Favorite>> {
    let sql = format!(
        "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE user_id = ?1
         ORDER BY added_at DESC, rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([user_id], map_favorite)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn get_favorite(
    conn: &Connection,
    user_id: &str,
    content_id: &str,
) -> StoreResult<Option<Favorite>> {
    let sql =
        format!("SELECT {FAVORITE_COLUMNS} FROM favorites WHERE user_id = ?1 AND content_id = ?2");
    Ok(conn
        .query_row(&sql, [user_id, content_id], map_favorite)
        .optional()?)
}

/// Insert a favorite. The UNIQUE (user_id, content_id) constraint decides
/// duplicates, so two racing inserts store exactly one row.
pub fn add_favorite(conn: &Connection, user_id: &str, new: NewFavorite) -> StoreResult<Favorite> {
    let favorite = Favorite {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        content_id: new.content_id,
        content_type: new.content_type,
        title: new.title,
        poster: new.poster,
        year: new.year,
        rating: new.rating,
        added_at: Utc::now(),
    };

    conn.execute(
        "INSERT INTO favorites (id, user_id, content_id, content_type, title, poster, year, rating, added_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            favorite.id,
            favorite.user_id,
            favorite.content_id,
            favorite.content_type,
            favorite.title,
            favorite.poster,
            favorite.year,
            favorite.rating,
            favorite.added_at,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::Duplicate(DUPLICATE_MESSAGE.to_string())
        } else {
            StoreError::Sqlite(e)
        }
    })?;

    Ok(favorite)
}

/// Delete and return the user's favorite for `content_id`.
pub fn remove_favorite(conn: &Connection, user_id: &str, content_id: &str) -> StoreResult<Favorite> {
    let sql = format!(
        "DELETE FROM favorites WHERE user_id = ?1 AND content_id = ?2 RETURNING {FAVORITE_COLUMNS}"
    );
    conn.query_row(&sql, [user_id, content_id], map_favorite)
        .optional()?
        .ok_or_else(|| StoreError::NotFound(MISSING_MESSAGE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::{create_user, delete_user, NewUser};
    use crate::db::{get_conn, init_memory_pool};

    fn sample(content_id: &str, title: &str) -> NewFavorite {
        NewFavorite {
            content_id: content_id.to_string(),
            content_type: "movie".to_string(),
            title: title.to_string(),
            poster: None,
            year: Some("1972".to_string()),
            rating: Some("9.2".to_string()),
        }
    }

    fn user(conn: &Connection, email: &str) -> String {
        create_user(
            conn,
            NewUser {
                email,
                password_hash: "hash",
                first_name: None,
                last_name: None,
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn duplicate_favorite_keeps_single_row() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let uid = user(&conn, "a@a.io");

        add_favorite(&conn, &uid, sample("238", "The Godfather")).unwrap();
        let err = add_favorite(&conn, &uid, sample("238", "The Godfather")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref m) if m == DUPLICATE_MESSAGE));
        assert_eq!(list_favorites(&conn, &uid).unwrap().len(), 1);
    }

    #[test]
    fn same_content_for_different_users_is_allowed() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let a = user(&conn, "a@a.io");
        let b = user(&conn, "b@b.io");
        add_favorite(&conn, &a, sample("238", "The Godfather")).unwrap();
        add_favorite(&conn, &b, sample("238", "The Godfather")).unwrap();
        assert_eq!(list_favorites(&conn, &a).unwrap().len(), 1);
        assert_eq!(list_favorites(&conn, &b).unwrap().len(), 1);
    }

    #[test]
    fn list_is_newest_first() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let uid = user(&conn, "a@a.io");
        add_favorite(&conn, &uid, sample("1", "First")).unwrap();
        add_favorite(&conn, &uid, sample("2", "Second")).unwrap();
        add_favorite(&conn, &uid, sample("3", "Third")).unwrap();

        let titles: Vec<String> = list_favorites(&conn, &uid)
            .unwrap()
            .into_iter()
            .map(|f| f.title)
            .collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);
    }

    #[test]
    fn remove_missing_favorite_is_not_found() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let uid = user(&conn, "a@a.io");
        let err = remove_favorite(&conn, &uid, "404").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn remove_returns_deleted_row_and_only_touches_owner() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let a = user(&conn, "a@a.io");
        let b = user(&conn, "b@b.io");
        add_favorite(&conn, &a, sample("238", "The Godfather")).unwrap();

        assert!(remove_favorite(&conn, &b, "238").is_err());
        let removed = remove_favorite(&conn, &a, "238").unwrap();
        assert_eq!(removed.title, "The Godfather");
        assert!(get_favorite(&conn, &a, "238").unwrap().is_none());
    }

    #[test]
    fn favorites_cascade_with_user() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let uid = user(&conn, "a@a.io");
        add_favorite(&conn, &uid, sample("238", "The Godfather")).unwrap();
        assert!(delete_user(&conn, &uid).unwrap());

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
