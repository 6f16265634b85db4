use std::fmt;
use std::sync::OnceLock;

use bcrypt::BcryptError;

use crate::errors::AppError;

/// bcrypt work factor for every stored password.
pub const BCRYPT_COST: u32 = 10;

/// Longest password bcrypt accepts without truncating, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Hashes without truncation; passwords over [`MAX_PASSWORD_BYTES`] are
/// rejected with 400.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::non_truncating_hash(password, BCRYPT_COST).map_err(|e| match e {
        BcryptError::Truncation(_) => AppError::bad_request(anyhow::anyhow!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )),
        e => AppError::internal_error(format!("Failed to hash password: {e}")),
    })
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    match bcrypt::non_truncating_verify(password, hash) {
        Ok(matches) => Ok(matches),
        // No stored hash can come from a password bcrypt would truncate.
        Err(BcryptError::Truncation(_)) => Ok(false),
        Err(e) => Err(AppError::internal_error(format!(
            "Failed to verify password: {e}"
        ))),
    }
}

/// Spends one bcrypt verification on a throwaway hash. Login calls this when
/// no account matches, so unknown emails take as long as wrong passwords.
pub fn verify_dummy_password(candidate: &str) {
    let hash = DUMMY_HASH.get_or_init(|| hash_password("scholaris-unmatched-account").ok());
    if let Some(hash) = hash {
        let _ = verify_password(candidate, hash);
    }
}

/// A bcrypt hash. The only way to build one from user input is
/// [`PasswordHash::from_plaintext`], so plaintext never reaches an insert.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn from_plaintext(plaintext: &str) -> Result<Self, AppError> {
        hash_password(plaintext).map(Self)
    }

    /// Wraps a hash loaded from storage.
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn verify(&self, candidate: &str) -> Result<bool, AppError> {
        verify_password(candidate, &self.0)
    }

    /// Returns a new hash when `plaintext` differs from the password this
    /// hash was built from, `None` when it is the same password.
    pub fn rehash_if_changed(&self, plaintext: &str) -> Result<Option<Self>, AppError> {
        if self.verify(plaintext)? {
            return Ok(None);
        }
        Self::from_plaintext(plaintext).map(Some)
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

impl From<String> for PasswordHash {
    fn from(hash: String) -> Self {
        Self::from_stored(hash)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_uses_cost_10() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.starts_with("$2b$10$"));
    }

    #[test]
    fn test_hash_differs_per_call() {
        let a = hash_password("password123").unwrap();
        let b = hash_password("password123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_no_truncation_past_72_bytes() {
        let base = "x".repeat(MAX_PASSWORD_BYTES);
        let hash = hash_password(&base).unwrap();
        assert!(verify_password(&base, &hash).unwrap());
        assert!(!verify_password(&format!("{base}B"), &hash).unwrap());

        let err = hash_password(&format!("{base}A")).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_last_character_matters_at_the_limit() {
        let base = "x".repeat(MAX_PASSWORD_BYTES - 1);
        let hash = hash_password(&format!("{base}A")).unwrap();
        assert!(verify_password(&format!("{base}A"), &hash).unwrap());
        assert!(!verify_password(&format!("{base}B"), &hash).unwrap());
    }

    #[test]
    fn test_verify_dummy_password_does_not_panic() {
        verify_dummy_password("anything");
        verify_dummy_password(&"y".repeat(100));
    }

    #[test]
    fn test_verify_against_garbage_hash_is_internal_error() {
        let err = verify_password("anything", "not-a-bcrypt-hash").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rehash_if_changed() {
        let hash = PasswordHash::from_plaintext("first-password").unwrap();
        assert!(hash.rehash_if_changed("first-password").unwrap().is_none());

        let next = hash.rehash_if_changed("second-password").unwrap().unwrap();
        assert!(next.verify("second-password").unwrap());
        assert!(!next.verify("first-password").unwrap());
    }

    #[test]
    fn test_debug_is_redacted() {
        let hash = PasswordHash::from_plaintext("hidden").unwrap();
        assert_eq!(format!("{hash:?}"), "PasswordHash(***)");
    }
}
