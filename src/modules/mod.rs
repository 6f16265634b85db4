//! Feature modules. Each has a `service` holding the database work and,
//! where it serves HTTP, a `controller` and `router`.

pub mod actors;
pub mod admins;
pub mod auth;
pub mod schools;
pub mod students;
