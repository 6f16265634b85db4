//! JWT signing configuration.
//!
//! - `JWT_SECRET`: HMAC secret for HS256 (default: a development-only value)
//! - `JWT_EXPIRY`: token lifetime in seconds (default: 86400, one day)

use std::env;

const DEV_SECRET: &str = "scholaris-dev-secret-change-me";
pub const DEFAULT_EXPIRY_SECS: i64 = 86_400;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub expiry: i64,
}

impl JwtConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEV_SECRET.to_string()),
            expiry: env::var("JWT_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| *v > 0)
                .unwrap_or(DEFAULT_EXPIRY_SECS),
        }
    }

    pub fn new(secret: impl Into<String>, expiry: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiry", &self.expiry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secret() {
        let config = JwtConfig::new("super-secret", 60);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("60"));
    }
}
