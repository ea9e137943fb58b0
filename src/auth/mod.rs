use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{routing::{get, post}, Router};

use crate::{AppError, AppResult, AppState};

mod login;
mod logout;
mod signup;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", get(logout::logout))
        .route("/signup", post(signup::signup))
}

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::from(format!("Password hashing failed: {err}")))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|hash| {
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    })
}

/// Only same-site paths are followed after login or logout.
pub(crate) fn return_to(return_url: Option<String>) -> String {
    return_url
        .filter(|url| url.starts_with('/') && !url.starts_with("//"))
        .unwrap_or("/".to_string())
}
