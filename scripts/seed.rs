//! Create the test and demo accounts with a few favorites. Safe to run twice.
//! Usage:
//!   cargo run --bin streamflix_seed
//! Uses DATABASE_PATH and PASSWORD_COST from the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use streamflix::auth::hash_password;
use streamflix::db::favorites::{self, NewFavorite};
use streamflix::db::users::{self, NewUser};
use streamflix::db::{self, DbPool};
use streamflix::models::User;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct SeedUser {
    email: &'static str,
    password: &'static str,
    first_name: &'static str,
    last_name: &'static str,
}

const TEST_USER: SeedUser = SeedUser {
    email: "john@doe.com",
    password: "johndoe123",
    first_name: "John",
    last_name: "Doe",
};

const DEMO_USER: SeedUser = SeedUser {
    email: "user@streamflix.com",
    password: "streamflix123",
    first_name: "Stream",
    last_name: "Flix",
};

// (content id, type, title, poster path, year, rating)
const DEMO_FAVORITES: [(&str, &str, &str, &str, &str, &str); 4] = [
    ("238", "movie", "The Godfather", "/3bhkrj58Vtu7enYsRolD1fZdja1.jpg", "1972", "9.2"),
    ("424", "movie", "Schindler's List", "/sF1U4EUQS8YHUYjNl3pMGNIQyr0.jpg", "1993", "8.9"),
    ("1399", "series", "Game of Thrones", "/1XS1oqL89opfnbLl8WnZY1O1uJx.jpg", "2011", "9.3"),
    ("94605", "series", "Arcane", "/fqldf2t8ztc9aiwn3k6mlX3tvRT.jpg", "2021", "8.7"),
];

async fn ensure_user(pool: &DbPool, seed: &SeedUser, cost: u32) -> Result<User> {
    {
        let conn = db::get_conn(pool)?;
        if let Some(existing) = users::get_user_by_email(&conn, seed.email)? {
            info!("User {} already exists", seed.email);
            return Ok(existing);
        }
    }
    let hash = hash_password(seed.password.to_string(), cost).await?;
    let conn = db::get_conn(pool)?;
    let user = users::create_user(
        &conn,
        NewUser {
            email: seed.email,
            password_hash: &hash,
            first_name: Some(seed.first_name),
            last_name: Some(seed.last_name),
        },
    )?;
    info!("Created user {}", user.email);
    Ok(user)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "streamflix.db".to_string());
    let cost = match env::var("PASSWORD_COST") {
        Ok(raw) => raw.trim().parse().context("PASSWORD_COST must be a number")?,
        Err(_) => bcrypt::DEFAULT_COST,
    };
    let pool = db::init_pool(&db_path).with_context(|| format!("Failed to open {}", db_path))?;

    ensure_user(&pool, &TEST_USER, cost).await?;
    let demo = ensure_user(&pool, &DEMO_USER, cost).await?;

    let conn = db::get_conn(&pool)?;
    let mut added = 0;
    for (content_id, content_type, title, poster, year, rating) in DEMO_FAVORITES {
        if favorites::get_favorite(&conn, &demo.id, content_id)?.is_some() {
            continue;
        }
        favorites::add_favorite(
            &conn,
            &demo.id,
            NewFavorite {
                content_id: content_id.to_string(),
                content_type: content_type.to_string(),
                title: title.to_string(),
                poster: Some(streamflix::tmdb::image_url(poster, "w500")),
                year: Some(year.to_string()),
                rating: Some(rating.to_string()),
            },
        )?;
        added += 1;
    }
    info!("Seed complete: {} favorites added for {}", added, demo.email);
    Ok(())
}
