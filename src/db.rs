use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::AppConfig;

/// Open the SQLite pool described by the config. The file is created if it
/// does not exist yet.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("parse database url {}", config.database_url))?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("connect to database")
}

/// Create both tables if they are missing. This is not a migration system:
/// an existing table with a different shape is left untouched.
pub async fn ensure_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT    NOT NULL UNIQUE
        )
        "#,
    )
    .execute(db)
    .await
    .context("create users table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS food_records (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            date         TEXT    NOT NULL,
            recipe_name  TEXT    NOT NULL,
            servings     REAL    NOT NULL,
            energy       REAL    NOT NULL,
            protein      REAL    NOT NULL,
            fat          REAL    NOT NULL,
            carbohydrate REAL    NOT NULL
        )
        "#,
    )
    .execute(db)
    .await
    .context("create food_records table")?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_food_records_user_date
            ON food_records (user_id, date)
        "#,
    )
    .execute(db)
    .await
    .context("create food_records index")?;

    Ok(())
}

/// Single-connection in-memory pool with the schema applied.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("memory url")
        .foreign_keys(true);
    // one connection that never recycles, otherwise the in-memory db vanishes
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("open in-memory sqlite");
    ensure_schema(&db).await.expect("schema");
    db
}
