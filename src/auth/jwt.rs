use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;

/// Fixed lifetime of every issued token. There is no refresh flow.
pub const TOKEN_TTL: Duration = Duration::hours(24);

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            // a token asserting any algorithm but HS256 is treated as forged
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                AuthError::InvalidSignature
            }
            _ => AuthError::Malformed,
        }
    }
}

/// HMAC signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: TOKEN_TTL,
        }
    }

    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        self.sign_at(user_id, OffsetDateTime::now_utc())
    }

    /// Signs as if issued at `issued_at`.
    pub fn sign_at(&self, user_id: i64, issued_at: OffsetDateTime) -> anyhow::Result<String> {
        let exp = issued_at + self.ttl;
        let claims = Claims {
            sub: user_id,
            iat: issued_at.unix_timestamp(),
            exp: exp.unix_timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        // `sub` is numeric; its presence is enforced by deserializing into `Claims`
        validation.set_required_spec_claims(&["exp"]);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

pub fn issue_token(user_id: i64, secret: &str) -> anyhow::Result<String> {
    JwtKeys::new(secret).sign(user_id)
}

pub fn validate_token(token: &str, secret: &str) -> Result<i64, AuthError> {
    JwtKeys::new(secret).verify(token).map(|claims| claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrips_user_id() {
        let token = issue_token(42, "dev-secret").expect("sign");
        assert_eq!(validate_token(&token, "dev-secret"), Ok(42));
    }

    #[test]
    fn expiry_is_twenty_four_hours_after_issue() {
        let keys = JwtKeys::new("dev-secret");
        let now = OffsetDateTime::now_utc();
        let token = keys.sign_at(7, now).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn token_just_inside_lifetime_is_accepted() {
        let keys = JwtKeys::new("dev-secret");
        let issued = OffsetDateTime::now_utc() - TOKEN_TTL + Duration::minutes(1);
        let token = keys.sign_at(42, issued).unwrap();
        assert_eq!(keys.verify(&token).map(|c| c.sub), Ok(42));
    }

    #[test]
    fn token_past_lifetime_is_expired() {
        let keys = JwtKeys::new("dev-secret");
        let issued = OffsetDateTime::now_utc() - TOKEN_TTL - Duration::seconds(1);
        let token = keys.sign_at(42, issued).unwrap();
        assert_eq!(keys.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn other_secret_fails_signature() {
        let token = issue_token(42, "secret-a").unwrap();
        assert_eq!(
            validate_token(&token, "secret-b"),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let claims = Claims {
            sub: 42,
            iat: OffsetDateTime::now_utc().unix_timestamp(),
            exp: (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert_eq!(
            validate_token(&token, "dev-secret"),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn freshly_signed_token_verifies_with_numeric_subject() {
        let keys = JwtKeys::new("dev-secret");
        let token = keys.sign(42).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn token_without_subject_is_malformed() {
        let exp = (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp();
        let token = encode(
            &Header::new(ALGORITHM),
            &serde_json::json!({ "exp": exp }),
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert_eq!(
            validate_token(&token, "dev-secret"),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            validate_token("not.a.jwt", "dev-secret"),
            Err(AuthError::Malformed)
        );
        assert_eq!(validate_token("", "dev-secret"), Err(AuthError::Malformed));
    }
}
