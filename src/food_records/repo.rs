use sqlx::SqlitePool;
use time::Date;

use super::repo_types::{FoodRecord, NewFoodRecord};

pub async fn insert(db: &SqlitePool, rec: &NewFoodRecord) -> sqlx::Result<FoodRecord> {
    sqlx::query_as::<_, FoodRecord>(
        r#"
        INSERT INTO food_records
            (user_id, date, recipe_name, servings, energy, protein, fat, carbohydrate)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        RETURNING id, user_id, date, recipe_name, servings, energy, protein, fat, carbohydrate
        "#,
    )
    .bind(rec.user_id)
    .bind(rec.date)
    .bind(&rec.recipe_name)
    .bind(rec.servings)
    .bind(rec.nutrients.energy)
    .bind(rec.nutrients.protein)
    .bind(rec.nutrients.fat)
    .bind(rec.nutrients.carbohydrate)
    .fetch_one(db)
    .await
}

pub async fn list_by_user_and_date(
    db: &SqlitePool,
    user_id: i64,
    date: Date,
) -> sqlx::Result<Vec<FoodRecord>> {
    sqlx::query_as::<_, FoodRecord>(
        r#"
        SELECT id, user_id, date, recipe_name, servings, energy, protein, fat, carbohydrate
          FROM food_records
         WHERE user_id = ?1 AND date = ?2
         ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await
}

#[cfg(test)]
pub async fn count_by_user(db: &SqlitePool, user_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM food_records WHERE user_id = ?1")
        .bind(user_id)
        .fetch_one(db)
        .await
}
