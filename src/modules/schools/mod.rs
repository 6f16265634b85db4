//! School code allocation.

pub mod service;

pub use service::SchoolCodeService;
