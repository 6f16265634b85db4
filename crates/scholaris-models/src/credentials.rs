use scholaris_core::{AppError, PasswordHash};

/// An account that authenticates with a password.
pub trait Credentialed {
    fn password_hash(&self) -> &PasswordHash;

    /// True only for the exact plaintext the stored hash was built from.
    fn compare_password(&self, candidate: &str) -> Result<bool, AppError> {
        self.password_hash().verify(candidate)
    }
}

/// Emails are stored and looked up trimmed and lowercased, so one mailbox
/// maps to one account per role.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Head@School.TEST "), "head@school.test");
        assert_eq!(normalize_email("a@b.test"), "a@b.test");
    }
}
