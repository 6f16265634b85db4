//! Admin registration and admin-only management endpoints.

pub mod controller;
pub mod router;
pub mod service;

pub use router::init_admin_router;
pub use service::AdminService;
