use std::collections::HashMap;

use axum::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::users::repo_types::{ProfileChanges, User};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("username already exists")]
    UsernameTaken,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<User>>;
    async fn create(&self, user: User) -> RepoResult<User>;
    async fn update_profile(
        &self,
        username: &str,
        changes: ProfileChanges,
    ) -> RepoResult<Option<User>>;
    /// Returns false when no user has that username.
    async fn set_token(&self, username: &str, token: Option<&str>) -> RepoResult<bool>;
    async fn delete(&self, username: &str) -> RepoResult<bool>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, name, password, token
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, name, password, token
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: User) -> RepoResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, name, password, token)
            VALUES ($1, $2, $3, $4)
            RETURNING username, name, password, token
            "#,
        )
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password)
        .bind(&user.token)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => RepoError::UsernameTaken,
            other => RepoError::Database(other),
        })?;
        Ok(created)
    }

    async fn update_profile(
        &self,
        username: &str,
        changes: ProfileChanges,
    ) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                password = COALESCE($3, password)
            WHERE username = $1
            RETURNING username, name, password, token
            "#,
        )
        .bind(username)
        .bind(changes.name)
        .bind(changes.password_hash)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn set_token(&self, username: &str, token: Option<&str>) -> RepoResult<bool> {
        let result = sqlx::query(r#"UPDATE users SET token = $2 WHERE username = $1"#)
            .bind(username)
            .bind(token)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, username: &str) -> RepoResult<bool> {
        let result = sqlx::query(r#"DELETE FROM users WHERE username = $1"#)
            .bind(username)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-process store keyed by username. Backs the fake app state.
#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    async fn create(&self, user: User) -> RepoResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(RepoError::UsernameTaken);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        username: &str,
        changes: ProfileChanges,
    ) -> RepoResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(username) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(hash) = changes.password_hash {
            user.password = hash;
        }
        Ok(Some(user.clone()))
    }

    async fn set_token(&self, username: &str, token: Option<&str>) -> RepoResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(username) {
            Some(user) => {
                user.token = token.map(str::to_owned);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, username: &str) -> RepoResult<bool> {
        Ok(self.users.write().await.remove(username).is_some())
    }
}
