//! Argon2id password hashing for admin and client accounts.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Checked when a login names no known account.
const DECOY_PASSWORD: &str = "bilemo-decoy-password";

static DECOY_HASH: OnceLock<String> = OnceLock::new();

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hash error: {0}")]
    Hash(argon2::password_hash::Error),

    #[error("Password verification task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash a password into a PHC string (`$argon2id$...`) with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// A wrong password is `Ok(false)`; only a malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Checks `password` against `hashes` in order on the blocking pool and
/// returns the index of the first match.
///
/// With no candidates the password is still run against a decoy hash, so an
/// unknown email costs one verification like a known one.
pub async fn verify_any(password: &str, hashes: Vec<String>) -> Result<Option<usize>, PasswordError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || {
        if hashes.is_empty() {
            verify_password(&password, decoy_hash()?).map_err(PasswordError::Hash)?;
            return Ok(None);
        }
        for (index, hash) in hashes.iter().enumerate() {
            if verify_password(&password, hash).map_err(PasswordError::Hash)? {
                return Ok(Some(index));
            }
        }
        Ok(None)
    })
    .await?
}

fn decoy_hash() -> Result<&'static str, PasswordError> {
    if let Some(hash) = DECOY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password(DECOY_PASSWORD).map_err(PasswordError::Hash)?;
    Ok(DECOY_HASH.get_or_init(|| hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn verifies_correct_password_only() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("password124", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("password123", "not-a-hash").is_err());
    }

    #[tokio::test]
    async fn verify_any_returns_first_matching_candidate() {
        let other = hash_password("something-else").unwrap();
        let mine = hash_password("password123").unwrap();

        assert_eq!(verify_any("password123", vec![other.clone(), mine]).await.unwrap(), Some(1));
        assert_eq!(verify_any("password123", vec![other]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_account_is_checked_against_the_decoy() {
        assert_eq!(verify_any("password123", Vec::new()).await.unwrap(), None);
        assert_eq!(verify_any(DECOY_PASSWORD, Vec::new()).await.unwrap(), None);
        assert!(DECOY_HASH.get().is_some());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn verification_does_not_hold_the_runtime() {
        let hash = hash_password("password123").unwrap();
        let verify = verify_any("password123", vec![hash]);
        tokio::pin!(verify);

        tokio::select! {
            biased;
            _ = &mut verify => panic!("verification completed inline on the runtime thread"),
            _ = tokio::time::sleep(Duration::from_millis(1)) => {}
        }
        assert_eq!(verify.await.unwrap(), Some(0));
    }
}
