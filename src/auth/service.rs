//! Registration, login, profile management, and token lifecycle.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::PgPool;
use uuid::Uuid;

use super::{generate_token_secret, token_digest, User, UserProfile};
use crate::error::{is_unique_violation, ApiError, Result};

/// Hashes a plain-text password into a PHC string for storage.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Verifies a plain-text password against a stored hash. A mismatch is
/// `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(stored_hash: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Internal(format!("invalid stored password hash: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ApiError::Internal(format!(
            "password verification failed: {e}"
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates the account and signs it straight in, returning the profile
    /// and the one-time plaintext token.
    pub async fn register(&self, new: NewUser) -> Result<(UserProfile, String)> {
        let password_hash = hash_password(&new.password)?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, 'customer', NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Email is already registered".to_string())
            } else {
                e.into()
            }
        })?;

        let token = self.issue_token(user.id).await?;
        Ok((UserProfile::from(&user), token))
    }

    /// Credentials check and token issuance. The response never says which
    /// of email or password was wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(UserProfile, String)> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::Authentication("Invalid credentials".to_string()))?;

        if !verify_password(&user.password_hash, password)? {
            return Err(ApiError::Authentication("Invalid credentials".to_string()));
        }

        let token = self.issue_token(user.id).await?;
        Ok((UserProfile::from(&user), token))
    }

    async fn issue_token(&self, user_id: Uuid) -> Result<String> {
        let secret = generate_token_secret();
        sqlx::query(
            "INSERT INTO api_tokens (id, user_id, token_digest, created_at) \
             VALUES ($1, $2, $3, NOW())",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(token_digest(&secret))
        .execute(&self.db)
        .await?;
        Ok(secret)
    }

    /// Resolves a presented bearer secret to its user, if the token exists.
    pub async fn user_for_token(&self, secret: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT u.* FROM users u \
             JOIN api_tokens t ON t.user_id = u.id \
             WHERE t.token_digest = $1",
        )
        .bind(token_digest(secret))
        .fetch_optional(&self.db)
        .await
        .map_err(Into::into)
    }

    /// Revokes the token used on this request; the bearer value dies with
    /// the logout.
    pub async fn revoke_token(&self, digest: &str) -> Result<()> {
        sqlx::query("DELETE FROM api_tokens WHERE token_digest = $1")
            .bind(digest)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        Ok(UserProfile::from(&user))
    }

    /// Applies only the provided fields; a new password is re-hashed here.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<UserProfile> {
        let password_hash = match &changes.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 password_hash = COALESCE($4, password_hash), \
                 phone = COALESCE($5, phone), \
                 address = COALESCE($6, address), \
                 city = COALESCE($7, city), \
                 postal_code = COALESCE($8, postal_code), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(password_hash)
        .bind(changes.phone)
        .bind(changes.address)
        .bind(changes.city)
        .bind(changes.postal_code)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Email is already registered".to_string())
            } else {
                ApiError::from(e)
            }
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserProfile::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password(&hash, "correct horse battery").unwrap());
        assert!(!verify_password(&hash, "wrong password").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same input").unwrap();
        let b = hash_password("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_is_an_internal_error() {
        let err = verify_password("not-a-phc-string", "anything").unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
