//! # Scholaris Config
//!
//! Configuration types for the Scholaris API, each loaded from environment
//! variables with defaults suitable for local development:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: auth endpoint rate limiting
//! - [`server`]: bind address and deployment environment
//!
//! # Example
//!
//! ```ignore
//! use scholaris_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{Environment, ServerConfig};
