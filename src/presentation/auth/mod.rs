//! Authentication presentation layer: extractors, DTOs, and endpoints

pub mod controller;
pub mod extractors;
pub mod models;

pub use extractors::{AuthContext, OptionalAuth, RequireActiveUser, RequireAuth};
