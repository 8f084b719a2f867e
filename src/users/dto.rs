use serde::{Deserialize, Serialize};

use super::repo_types::User;

/// Body for create and rename.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
        }
    }
}
