//! Role-dispatched lookups and updates shared by every actor table.

pub mod service;

pub use service::ActorService;
