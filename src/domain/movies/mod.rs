//! Movie catalog domain: entities, scoring, and persistence traits

pub mod entities;
pub mod errors;
pub mod repositories;

pub use entities::{Movie, MovieChanges, NewMovie, ScoredMovie};
pub use errors::MovieError;
pub use repositories::{IMovieRepository, MovieFilter};
