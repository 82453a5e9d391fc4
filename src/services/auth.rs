//! Password hashing and session tokens.
//!
//! Passwords are hashed with argon2 (PHC string format). Sessions are a
//! signed JWT carried in an HttpOnly cookie; the claims embed the user id
//! and username so request handling never hits the database for identity.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::User;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "yatube_session";

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: i64,
    pub username: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: i64,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_hours,
        }
    }

    /// Issue a session token for a logged-in user.
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id,
            username: user.username.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.ttl_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("session token encoding failed: {e}")))
    }

    /// Decode and verify a session token. Invalid or expired tokens are
    /// treated as an anonymous session.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}
