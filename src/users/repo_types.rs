use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,          // surrogate key
    pub username: String, // unique, used as the external identifier
}
