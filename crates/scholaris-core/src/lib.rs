//! # Scholaris Core
//!
//! Foundational types shared by every Scholaris crate:
//!
//! - [`errors`]: the application error type and its HTTP mapping
//! - [`password`]: bcrypt hashing and the [`PasswordHash`] value
//!
//! # Example
//!
//! ```ignore
//! use scholaris_core::{AppError, PasswordHash};
//!
//! let hash = PasswordHash::from_plaintext("s3cret-pass")?;
//! if !hash.verify("s3cret-pass")? {
//!     return Err(AppError::unauthorized("Invalid email or password".to_string()));
//! }
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, ErrorResponse};
pub use password::{
    BCRYPT_COST, MAX_PASSWORD_BYTES, PasswordHash, hash_password, verify_dummy_password,
    verify_password,
};
