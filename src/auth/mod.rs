//! Token-based authentication: users, bearer tokens, and request extraction.
//!
//! Tokens are opaque secrets handed out once at login; only a SHA-256
//! digest is stored. Resolving a request means digesting the presented
//! bearer value and looking the digest up.

pub mod extract;
pub mod service;

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Projection of a user with the credential fields stripped; safe for any
/// client, including the public user endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            city: user.city.clone(),
            postal_code: user.postal_code.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 32 random bytes, hex-encoded. Returned to the client exactly once.
pub(crate) fn generate_token_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Digest stored (and looked up) in place of the plaintext secret.
pub(crate) fn token_digest(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_unique_and_hex() {
        let a = generate_token_secret();
        let b = generate_token_secret();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_stable_and_distinct_from_the_secret() {
        let secret = generate_token_secret();
        let digest = token_digest(&secret);
        assert_eq!(digest, token_digest(&secret));
        assert_ne!(digest, secret);
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn profile_never_carries_the_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "customer".to_string(),
            phone: None,
            address: None,
            city: None,
            postal_code: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "asha@example.com");
    }
}
