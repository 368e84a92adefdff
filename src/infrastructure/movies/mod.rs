//! Movie catalog persistence

pub mod movie_repository;

pub use movie_repository::PgMovieRepository;
