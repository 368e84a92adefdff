//! Movie catalog use cases

pub mod use_cases;

pub use use_cases::{
    CreateMovieUseCase, GetMovieUseCase, PopularMoviesUseCase, RecommendByDirectorUseCase,
    RecommendByGenreUseCase, SearchMoviesUseCase, SimilarMoviesUseCase, TrendingMoviesUseCase,
    UpdateMovieUseCase,
};
