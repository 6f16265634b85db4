//! # Scholaris Auth
//!
//! Actor roles and bearer tokens for the Scholaris API.
//!
//! - [`roles`]: the five actor roles a route can require
//! - [`claims`]: the token payload `{id, <role>ID, role, iat, exp}`
//! - [`jwt`]: HS256 token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use scholaris_auth::{ActorRole, create_access_token, verify_token};
//! use scholaris_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(student_id, ActorRole::Student, Some("st010m4567"), &config)?;
//!
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, ActorRole::Student);
//! ```

pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use roles::{ActorRole, UnknownRole};
