use sqlx::{Executor, Sqlite, SqliteConnection};

use super::repo_types::User;

impl User {
    pub async fn list_all<'e, E>(db: E) -> sqlx::Result<Vec<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Find a user by username.
    pub async fn find_by_username<'e, E>(db: E, username: &str) -> sqlx::Result<Option<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(conn: &mut SqliteConnection, username: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username)
            VALUES (?1)
            RETURNING id, username
            "#,
        )
        .bind(username)
        .fetch_one(conn)
        .await
    }

    pub async fn set_username(
        conn: &mut SqliteConnection,
        id: i64,
        username: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET username = ?2
             WHERE id = ?1
            RETURNING id, username
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_one(conn)
        .await
    }

    /// Delete the user and every food record it owns. Returns the number of
    /// food records removed.
    pub async fn delete_cascade(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<u64> {
        let records = sqlx::query("DELETE FROM food_records WHERE user_id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        conn.execute(sqlx::query("DELETE FROM users WHERE id = ?1").bind(id))
            .await?;
        Ok(records)
    }
}
