use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRef, FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState, users::repo_types::User};

/// Resolves the `Authorization` header to the user holding that token.
/// The header value is the raw token, with no scheme prefix.
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                debug!("missing Authorization header");
                ApiError::Unauthorized
            })?;

        match state.users.find_by_token(token).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!("invalid token");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// `Json` whose rejections render as 400 `{ "errors": ... }`.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(ValidJson(value))
    }
}
