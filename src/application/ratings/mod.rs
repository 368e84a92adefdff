//! User rating use cases

pub mod use_cases;

pub use use_cases::{DeleteRatingUseCase, ListRatingsUseCase, UpsertRatingUseCase};
