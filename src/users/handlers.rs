use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use tracing::instrument;

use crate::{
    error::ApiResult,
    response::Data,
    state::AppState,
    users::{
        dto::{LoginUserRequest, RegisterUserRequest, TokenResponse, UpdateUserRequest, UserResponse},
        extractors::{CurrentUser, ValidJson},
        services,
    },
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(register))
        .route("/api/users/login", post(login))
}

pub fn current_user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/current", get(get_current).patch(update_current))
        .route("/api/users/logout", delete(logout))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterUserRequest>,
) -> ApiResult<Data<UserResponse>> {
    let user = services::register(state.users.as_ref(), payload).await?;
    Ok(Data::new(user))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginUserRequest>,
) -> ApiResult<Data<TokenResponse>> {
    let token = services::login(state.users.as_ref(), payload).await?;
    Ok(Data::new(token))
}

#[instrument(skip_all, fields(username = %user.username))]
pub async fn get_current(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Data<UserResponse>> {
    let user = services::get(state.users.as_ref(), &user.username).await?;
    Ok(Data::new(user))
}

#[instrument(skip_all, fields(username = %user.username))]
pub async fn update_current(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<UpdateUserRequest>,
) -> ApiResult<Data<UserResponse>> {
    let user = services::update(state.users.as_ref(), &user.username, payload).await?;
    Ok(Data::new(user))
}

#[instrument(skip_all, fields(username = %user.username))]
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Data<&'static str>> {
    let ok = services::logout(state.users.as_ref(), &user.username).await?;
    Ok(Data::new(ok))
}
