use sqlx::SqlitePool;
use tracing::{info, warn};

use super::repo_types::User;
use crate::error::{is_unique_violation, ServiceError, ServiceResult};

pub(crate) fn normalize_username(raw: &str) -> ServiceResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        warn!("empty username");
        return Err(ServiceError::Validation("username is required".into()));
    }
    Ok(name.to_string())
}

fn taken(username: &str) -> ServiceError {
    ServiceError::AlreadyExists(format!("user '{username}'"))
}

fn missing(username: &str) -> ServiceError {
    ServiceError::NotFound(format!("user '{username}'"))
}

/// A unique-constraint hit that got past the lookup is still a duplicate.
fn map_duplicate(e: sqlx::Error, username: &str) -> ServiceError {
    if is_unique_violation(&e) {
        taken(username)
    } else {
        ServiceError::Database(e)
    }
}

pub async fn list_users(db: &SqlitePool) -> ServiceResult<Vec<User>> {
    Ok(User::list_all(db).await?)
}

pub async fn get_user(db: &SqlitePool, username: &str) -> ServiceResult<User> {
    User::find_by_username(db, username)
        .await?
        .ok_or_else(|| missing(username))
}

pub async fn create_user(db: &SqlitePool, username: &str) -> ServiceResult<User> {
    let username = normalize_username(username)?;

    let mut tx = db.begin().await?;
    if User::find_by_username(&mut *tx, &username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(taken(&username));
    }
    let user = User::insert(&mut tx, &username)
        .await
        .map_err(|e| map_duplicate(e, &username))?;
    tx.commit().await?;

    info!(user_id = user.id, username = %user.username, "user created");
    Ok(user)
}

pub async fn rename_user(db: &SqlitePool, old: &str, new: &str) -> ServiceResult<User> {
    let new = normalize_username(new)?;

    let mut tx = db.begin().await?;
    let user = User::find_by_username(&mut *tx, old)
        .await?
        .ok_or_else(|| missing(old))?;
    if user.username == new {
        return Ok(user);
    }
    if User::find_by_username(&mut *tx, &new).await?.is_some() {
        warn!(%old, %new, "rename target already taken");
        return Err(taken(&new));
    }
    let renamed = User::set_username(&mut tx, user.id, &new)
        .await
        .map_err(|e| map_duplicate(e, &new))?;
    tx.commit().await?;

    info!(user_id = renamed.id, %old, new = %renamed.username, "user renamed");
    Ok(renamed)
}

/// Removes the user together with its food records.
pub async fn delete_user(db: &SqlitePool, username: &str) -> ServiceResult<User> {
    let mut tx = db.begin().await?;
    let user = User::find_by_username(&mut *tx, username)
        .await?
        .ok_or_else(|| missing(username))?;
    let records = User::delete_cascade(&mut tx, user.id).await?;
    tx.commit().await?;

    info!(user_id = user.id, username = %user.username, records, "user deleted");
    Ok(user)
}
