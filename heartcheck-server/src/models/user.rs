//! Account DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use heartcheck_core::UserAccount;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "username must be 1-64 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    #[validate(email(message = "email address is not valid"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AccountInfo {
    pub username: String,
    pub email: String,
}

impl From<UserAccount> for AccountInfo {
    fn from(account: UserAccount) -> Self {
        Self {
            username: account.username,
            email: account.email,
        }
    }
}
