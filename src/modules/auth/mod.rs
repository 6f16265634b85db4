//! Per-role login, registration, profile and password endpoints.

pub mod controller;
pub mod router;
pub mod service;

pub use router::init_auth_router;
pub use service::AuthService;
