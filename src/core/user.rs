//! Account business logic - registration and credential verification.
//!
//! Passwords are hashed with Argon2id and a random salt; only the PHC string is stored.
//! Unknown usernames and wrong passwords produce the same error so that login does not
//! reveal which usernames exist.

use crate::{
    core::require_name,
    entities::{User, user},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const USERNAME_EXISTS: &str = "Username already exists";
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Hashes `password` into an Argon2id PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

/// Checks `password` against a stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| Error::PasswordHash {
        message: e.to_string(),
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Finds a user by exact username.
pub async fn get_user_by_username<C>(db: &C, username: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new account.
///
/// The username is trimmed; the password is taken as given and must be at least
/// [`MIN_PASSWORD_LENGTH`] characters.
pub async fn register_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let username = require_name(username, "Username")?;
    if password.is_empty() {
        return Err(Error::validation("Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let txn = db.begin().await?;

    if get_user_by_username(&txn, &username).await?.is_some() {
        warn!(%username, "Registration rejected: username taken");
        return Err(Error::Duplicate {
            message: USERNAME_EXISTS.to_string(),
        });
    }

    let user = user::ActiveModel {
        username: Set(username),
        password_hash: Set(hash_password(password)?),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| Error::from_insert(e, USERNAME_EXISTS))?;

    txn.commit().await?;

    info!(user_id = user.id, username = %user.username, "Registered user");
    Ok(user)
}

/// Verifies a username/password pair and returns the matching user.
///
/// # Errors
/// [`Error::Unauthorized`] for an unknown user or a wrong password alike.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let username = require_name(username, "Username")?;
    if password.is_empty() {
        return Err(Error::validation("Password is required"));
    }

    let Some(user) = get_user_by_username(db, &username).await? else {
        warn!(%username, "Login failed: unknown user");
        return Err(Error::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(%username, "Login failed: wrong password");
        return Err(Error::unauthorized(INVALID_CREDENTIALS));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_hash_and_verify_password() -> Result<()> {
        let hash = hash_password("correct horse")?;
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash)?);
        assert!(!verify_password("wrong horse", &hash)?);
        Ok(())
    }

    #[test]
    fn test_hashes_are_salted() -> Result<()> {
        assert_ne!(hash_password("same password")?, hash_password("same password")?);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_user_validation() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = register_user(&db, "  ", "long enough").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = register_user(&db, "alice", "").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = register_user(&db, "alice", "short").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_and_authenticate() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(&db, " alice ", "password123").await?;
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "password123");

        let logged_in = authenticate(&db, "alice", "password123").await?;
        assert_eq!(logged_in.id, user.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_username() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "alice").await?;

        let result = register_user(&db, "alice", "password123").await;
        assert!(matches!(result, Err(Error::Duplicate { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_credentials() -> Result<()> {
        let db = setup_test_db().await?;
        register_user(&db, "alice", "password123").await?;

        let wrong_password = authenticate(&db, "alice", "password124").await;
        let unknown_user = authenticate(&db, "mallory", "password123").await;

        match (wrong_password, unknown_user) {
            (Err(Error::Unauthorized { reason: a }), Err(Error::Unauthorized { reason: b })) => {
                assert_eq!(a, b);
            }
            other => panic!("expected two unauthorized errors, got {other:?}"),
        }
        Ok(())
    }
}
