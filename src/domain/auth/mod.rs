//! Authentication domain: users, credentials, and their persistence traits

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

pub use entities::{NewUser, User};
pub use errors::AuthError;
pub use repositories::IUserRepository;
pub use value_objects::{Email, PasswordHash, UserId, Username};
