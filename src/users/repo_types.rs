use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub username: String,      // primary key
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,      // Argon2 hash, not exposed in JSON
    #[serde(skip_serializing)]
    pub token: Option<String>, // session token, None when logged out
}

/// Fields a profile update may change. `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
}
