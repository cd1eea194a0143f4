use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    users::{
        dto::{
            LoginUserRequest, RegisterUserRequest, TokenResponse, UpdateUserRequest, UserResponse,
        },
        repo::UserRepo,
        repo_types::{ProfileChanges, User},
    },
};

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User is not found".into())
}

pub async fn register(repo: &dyn UserRepo, req: RegisterUserRequest) -> ApiResult<UserResponse> {
    let new_user = req.validate()?;

    if repo.find_by_username(&new_user.username).await?.is_some() {
        warn!(username = %new_user.username, "username already registered");
        return Err(ApiError::UsernameTaken);
    }

    let password = hash_password(&new_user.password)?;
    let user = repo
        .create(User {
            username: new_user.username,
            name: new_user.name,
            password,
            token: None,
        })
        .await?;

    info!(username = %user.username, "user registered");
    Ok(user.into())
}

pub async fn login(repo: &dyn UserRepo, req: LoginUserRequest) -> ApiResult<TokenResponse> {
    let credentials = req.validate()?;

    let Some(user) = repo.find_by_username(&credentials.username).await? else {
        warn!(username = %credentials.username, "login unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&credentials.password, &user.password)? {
        warn!(username = %user.username, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = Uuid::new_v4().to_string();
    if !repo.set_token(&user.username, Some(token.as_str())).await? {
        return Err(ApiError::InvalidCredentials);
    }

    info!(username = %user.username, "user logged in");
    Ok(TokenResponse { token })
}

pub async fn get(repo: &dyn UserRepo, username: &str) -> ApiResult<UserResponse> {
    let user = repo
        .find_by_username(username)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(user.into())
}

pub async fn update(
    repo: &dyn UserRepo,
    username: &str,
    req: UpdateUserRequest,
) -> ApiResult<UserResponse> {
    let update = req.validate()?;

    let password_hash = match update.password {
        Some(plain) => Some(hash_password(&plain)?),
        None => None,
    };
    let changes = ProfileChanges {
        name: update.name,
        password_hash,
    };
    debug!(
        %username,
        has_name = changes.name.is_some(),
        has_password = changes.password_hash.is_some(),
        "updating profile"
    );

    let user = repo
        .update_profile(username, changes)
        .await?
        .ok_or_else(user_not_found)?;

    info!(username = %user.username, "user updated");
    Ok(user.into())
}

pub async fn logout(repo: &dyn UserRepo, username: &str) -> ApiResult<&'static str> {
    if !repo.set_token(username, None).await? {
        return Err(user_not_found());
    }
    info!(%username, "user logged out");
    Ok("ok")
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("123").expect("hashing should succeed");
        assert_ne!(hash, "123");
        assert!(verify_password("123", &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("123").expect("hashing should succeed");
        assert!(!verify_password("122", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
