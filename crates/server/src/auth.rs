//! Bearer tokens and password hashes.

use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use uuid::Uuid;

use crate::ServerError;

pub const ISSUER: &str = "budget";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// HS256 signing material plus the token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn sign(&self, user_id: Uuid) -> Result<String, ServerError> {
        self.sign_at(user_id, OffsetDateTime::now_utc())
    }

    fn sign_at(&self, user_id: Uuid, issued_at: OffsetDateTime) -> Result<String, ServerError> {
        let ttl = TimeDuration::try_from(self.ttl)
            .map_err(|err| ServerError::Internal(format!("token ttl: {err}")))?;
        let claims = Claims {
            sub: user_id,
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + ttl).unix_timestamp(),
            iss: ISSUER.to_string(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| ServerError::Internal(format!("jwt encode: {err}")))?;
        tracing::debug!(%user_id, "jwt signed");
        Ok(token)
    }

    /// Checks signature, expiry and issuer.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

pub fn hash_password(plain: &str) -> Result<String, ServerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServerError::Internal(format!("argon2 hash_password: {err}")))
}

/// `Ok(false)` on a wrong password; `Err` only when `hash` is not a PHC string.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, ServerError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| ServerError::Internal(format!("argon2 parse hash: {err}")))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
