use sqlx::FromRow;
use time::Date;

use crate::nutrition::NutrientFacts;

/// One eaten meal. Nutrients are totals for `servings`, not per serving.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FoodRecord {
    pub id: i64,
    pub user_id: i64,
    pub date: Date,
    pub recipe_name: String,
    pub servings: f64,
    pub energy: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrate: f64,
}

#[derive(Debug, Clone)]
pub struct NewFoodRecord {
    pub user_id: i64,
    pub date: Date,
    pub recipe_name: String,
    pub servings: f64,
    pub nutrients: NutrientFacts,
}
