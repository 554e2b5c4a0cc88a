use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{info, warn};

use super::dto::{LoginRequest, SignupRequest};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo_types::User;
use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]{3,50}$").unwrap();
    // Verified against when the username is unknown so both login failures cost the same.
    static ref DUMMY_HASH: String =
        hash_password("fittrack-dummy-password").expect("dummy password hashes");
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Normalizes the payload in place and checks the credential policy.
pub(crate) fn validate_signup(payload: &mut SignupRequest) -> AppResult<()> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_username(&payload.username) {
        return Err(AppError::Validation(
            "Username must be 3-50 characters of letters, digits, '_', '-' or '.'".into(),
        ));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub async fn signup(db: &PgPool, mut payload: SignupRequest) -> AppResult<User> {
    validate_signup(&mut payload)?;

    let hash = hash_password(&payload.password)?;
    let user = User::create(db, &payload.username, &payload.email, &hash)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    warn!(username = %payload.username, "username or email already registered");
                }
            }
            AppError::Storage(e)
        })?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Checks the credentials and issues a token. Unknown user and wrong password are
/// indistinguishable to the caller.
pub async fn login(db: &PgPool, keys: &JwtKeys, payload: LoginRequest) -> AppResult<String> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("username and password are required".into()));
    }

    let Some(user) = User::find_by_username(db, username).await? else {
        let _ = verify_password(&payload.password, &DUMMY_HASH);
        warn!(%username, "login unknown username");
        return Err(AppError::Unauthorized("Invalid credentials"));
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials"));
    }

    let token = keys.sign(user.id)?;
    info!(user_id = user.id, "user logged in");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_request(username: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@example.com"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn username_shape() {
        assert!(is_valid_username("lifter_01"));
        assert!(is_valid_username("a.b-c"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"x".repeat(51)));
    }

    #[test]
    fn validate_signup_normalizes_fields() {
        let mut req = signup_request("  lifter  ", " Lifter@Example.COM ", "longenough");
        validate_signup(&mut req).unwrap();
        assert_eq!(req.username, "lifter");
        assert_eq!(req.email, "lifter@example.com");
    }

    #[test]
    fn validate_signup_rejects_short_password() {
        let mut req = signup_request("lifter", "lifter@example.com", "short");
        let err = validate_signup(&mut req).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("at least 8")));
    }

    #[test]
    fn validate_signup_rejects_bad_email() {
        let mut req = signup_request("lifter", "nope", "longenough");
        assert!(matches!(
            validate_signup(&mut req),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        assert!(DUMMY_HASH.starts_with("$argon2"));
        assert!(verify_password("fittrack-dummy-password", &DUMMY_HASH));
    }
}
