use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::{
    dto::AuthResponse,
    jwt::JwtKeys,
    password::hash_password,
};
use crate::{
    error::{ApiError, ApiResult},
    state::Store,
    users::{NewUser, User, UserStore},
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Account fields as submitted by a client, before validation.
pub struct NewAccount<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password: &'a str,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Validate, hash and insert a new account.
pub async fn create_account(store: &dyn Store, account: NewAccount<'_>) -> ApiResult<User> {
    let email = normalize_email(account.email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }
    validate_password(account.password)?;

    // fast path; the store still reports a racing duplicate as EmailTaken
    if store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(account.password)?;
    let user = store
        .create_user(NewUser {
            email,
            name: account.name.trim().to_string(),
            password_hash,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
        })
        .await?;
    Ok(user)
}

/// Sign a fresh access/refresh pair for `user`.
pub fn issue_tokens(keys: &JwtKeys, user: User) -> anyhow::Result<AuthResponse> {
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    })
}
