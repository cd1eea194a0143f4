use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{error::ApiError, users::repo_types::User};

const MAX_LEN: usize = 100;

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterUserRequest {
    #[serde(default, deserialize_with = "present")]
    pub username: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginUserRequest {
    #[serde(default, deserialize_with = "present")]
    pub username: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Value>,
}

/// Request body for a profile update; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Value>,
}

/// Public view of a user.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            name: user.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
}

pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct ProfileUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Keeps an explicit `null` as `Some(Value::Null)` so it is not mistaken for an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn required(field: &str, value: Option<Value>) -> Result<String, ApiError> {
    match value {
        Some(v) => checked(field, v),
        None => Err(ApiError::Validation(format!("\"{field}\" is required"))),
    }
}

fn optional(field: &str, value: Option<Value>) -> Result<Option<String>, ApiError> {
    value.map(|v| checked(field, v)).transpose()
}

fn checked(field: &str, value: Value) -> Result<String, ApiError> {
    let Value::String(value) = value else {
        return Err(ApiError::Validation(format!("\"{field}\" must be a string")));
    };
    if value.is_empty() {
        return Err(ApiError::Validation(format!(
            "\"{field}\" is not allowed to be empty"
        )));
    }
    if value.chars().count() > MAX_LEN {
        return Err(ApiError::Validation(format!(
            "\"{field}\" length must be less than or equal to {MAX_LEN} characters long"
        )));
    }
    Ok(value)
}

impl RegisterUserRequest {
    pub fn validate(self) -> Result<NewUser, ApiError> {
        Ok(NewUser {
            username: required("username", self.username)?,
            password: required("password", self.password)?,
            name: required("name", self.name)?,
        })
    }
}

impl LoginUserRequest {
    pub fn validate(self) -> Result<Credentials, ApiError> {
        Ok(Credentials {
            username: required("username", self.username)?,
            password: required("password", self.password)?,
        })
    }
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<ProfileUpdate, ApiError> {
        Ok(ProfileUpdate {
            name: optional("name", self.name)?,
            password: optional("password", self.password)?,
        })
    }
}
