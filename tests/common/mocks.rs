//! In-memory repository implementations for integration tests

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use cinerec::domain::auth::{
    entities::{NewUser, User},
    errors::AuthError,
    repositories::IUserRepository,
    value_objects::{Email, UserId, Username},
};
use cinerec::domain::movies::{
    entities::{Movie, MovieChanges, NewMovie},
    errors::MovieError,
    repositories::{IMovieRepository, MovieFilter},
};
use cinerec::domain::ratings::{IRatingRepository, NewRating, RatingError, UserRating};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn opt_contains_ci(haystack: &Option<String>, needle: &str) -> bool {
    haystack
        .as_deref()
        .map(|h| contains_ci(h, needle))
        .unwrap_or(false)
}

/// In-memory user store
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Flip the active flag, simulating an admin disabling the account
    pub fn deactivate(&self, user_id: i64) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == UserId::new(user_id)) {
            user.is_active = false;
        }
    }

    /// Force an API key expiry, simulating the passage of time
    pub fn expire_api_key(&self, user_id: i64) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == UserId::new(user_id)) {
            user.api_key_expires_at = Some(Utc::now() - chrono::Duration::hours(1));
        }
    }
}

#[async_trait]
impl IUserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.api_key.as_deref() == Some(api_key))
            .cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, AuthError> {
        let now = Utc::now();
        let user = User {
            id: UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            preferred_genres: new_user.preferred_genres.clone(),
            preferred_languages: new_user.preferred_languages.clone(),
            min_rating: new_user.min_rating,
            max_runtime: new_user.max_runtime,
            include_adult: new_user.include_adult,
            is_active: true,
            is_verified: false,
            api_key: None,
            api_key_expires_at: None,
            created_at: now,
            updated_at: now,
            last_login: None,
        };

        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update_last_login(
        &self,
        user_id: UserId,
        logged_in_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.last_login = Some(logged_in_at);
        }
        Ok(())
    }

    async fn set_api_key(
        &self,
        user_id: UserId,
        api_key: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AuthError::Database {
                message: format!("No user row to attach API key to: {}", user_id),
            })?;

        user.api_key = Some(api_key.to_string());
        user.api_key_expires_at = Some(expires_at);
        Ok(())
    }
}

/// In-memory movie store mirroring the SQL repository's filter semantics
#[derive(Default)]
pub struct InMemoryMovieRepository {
    movies: Mutex<Vec<Movie>>,
    next_id: AtomicI64,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self {
            movies: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn sorted_by_popularity(mut movies: Vec<Movie>) -> Vec<Movie> {
        movies.sort_by(|a, b| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        movies
    }
}

#[async_trait]
impl IMovieRepository for InMemoryMovieRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, MovieError> {
        Ok(self
            .movies
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn search(&self, filter: &MovieFilter) -> Result<Vec<Movie>, MovieError> {
        let movies: Vec<Movie> = self
            .movies
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                if let Some(query) = filter.query.as_deref().filter(|q| !q.trim().is_empty()) {
                    let query = query.trim();
                    let matches = contains_ci(&m.title, query)
                        || opt_contains_ci(&m.overview, query)
                        || opt_contains_ci(&m.cast, query)
                        || opt_contains_ci(&m.director, query);
                    if !matches {
                        return false;
                    }
                }
                if !filter.genres.iter().all(|g| opt_contains_ci(&m.genres, g)) {
                    return false;
                }
                if let Some(min_rating) = filter.min_rating {
                    if m.vote_average < min_rating {
                        return false;
                    }
                }
                if let Some(max_runtime) = filter.max_runtime {
                    if m.runtime.map(|r| r > max_runtime).unwrap_or(true) {
                        return false;
                    }
                }
                if let Some(year_from) = filter.year_from {
                    if m.release_date.map(|d| d.year() < year_from).unwrap_or(true) {
                        return false;
                    }
                }
                if let Some(year_to) = filter.year_to {
                    if m.release_date.map(|d| d.year() > year_to).unwrap_or(true) {
                        return false;
                    }
                }
                if !filter.include_adult && m.adult {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        Ok(Self::sorted_by_popularity(movies)
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn popular(&self, limit: i64, offset: i64) -> Result<Vec<Movie>, MovieError> {
        let movies: Vec<Movie> = self
            .movies
            .lock()
            .unwrap()
            .iter()
            .filter(|m| !m.adult)
            .cloned()
            .collect();

        Ok(Self::sorted_by_popularity(movies)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn trending(&self, min_popularity: f64, limit: i64) -> Result<Vec<Movie>, MovieError> {
        let movies: Vec<Movie> = self
            .movies
            .lock()
            .unwrap()
            .iter()
            .filter(|m| !m.adult && m.release_date.is_some() && m.popularity > min_popularity)
            .cloned()
            .collect();

        Ok(Self::sorted_by_popularity(movies)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn by_genre(
        &self,
        genre: &str,
        min_vote_count: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, MovieError> {
        let movies: Vec<Movie> = self
            .movies
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                !m.adult && opt_contains_ci(&m.genres, genre) && m.vote_count >= min_vote_count
            })
            .cloned()
            .collect();

        Ok(Self::sorted_by_popularity(movies)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn by_director(&self, director: &str, limit: i64) -> Result<Vec<Movie>, MovieError> {
        let movies: Vec<Movie> = self
            .movies
            .lock()
            .unwrap()
            .iter()
            .filter(|m| !m.adult && opt_contains_ci(&m.director, director))
            .cloned()
            .collect();

        Ok(Self::sorted_by_popularity(movies)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn by_any_genre(
        &self,
        genres: &[String],
        exclude_id: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, MovieError> {
        if genres.is_empty() {
            return Ok(Vec::new());
        }

        let movies: Vec<Movie> = self
            .movies
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                !m.adult
                    && m.id != exclude_id
                    && genres.iter().any(|g| opt_contains_ci(&m.genres, g))
            })
            .cloned()
            .collect();

        Ok(Self::sorted_by_popularity(movies)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn insert(&self, new_movie: &NewMovie) -> Result<Movie, MovieError> {
        let now = Utc::now();
        let movie = Movie {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: new_movie.title.clone(),
            original_title: new_movie.original_title.clone(),
            overview: new_movie.overview.clone(),
            tagline: new_movie.tagline.clone(),
            release_date: new_movie.release_date,
            runtime: new_movie.runtime,
            vote_average: new_movie.vote_average,
            vote_count: new_movie.vote_count,
            popularity: new_movie.popularity,
            budget: new_movie.budget,
            revenue: new_movie.revenue,
            status: new_movie.status.clone(),
            original_language: new_movie.original_language.clone(),
            genres: new_movie.genres.clone(),
            production_companies: new_movie.production_companies.clone(),
            production_countries: new_movie.production_countries.clone(),
            director: new_movie.director.clone(),
            cast: new_movie.cast.clone(),
            adult: new_movie.adult,
            video: new_movie.video,
            created_at: now,
            updated_at: now,
        };

        self.movies.lock().unwrap().push(movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: i64, changes: &MovieChanges) -> Result<Option<Movie>, MovieError> {
        let mut movies = self.movies.lock().unwrap();
        let Some(movie) = movies.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            movie.title = title.clone();
        }
        if let Some(overview) = &changes.overview {
            movie.overview = Some(overview.clone());
        }
        if let Some(vote_average) = changes.vote_average {
            movie.vote_average = vote_average;
        }
        if let Some(popularity) = changes.popularity {
            movie.popularity = popularity;
        }
        if let Some(genres) = &changes.genres {
            movie.genres = Some(genres.clone());
        }
        if let Some(director) = &changes.director {
            movie.director = Some(director.clone());
        }
        movie.updated_at = Utc::now();

        Ok(Some(movie.clone()))
    }
}

/// In-memory rating store with (user, movie) upsert semantics
#[derive(Default)]
pub struct InMemoryRatingRepository {
    ratings: Mutex<Vec<UserRating>>,
    next_id: AtomicI64,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self {
            ratings: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl IRatingRepository for InMemoryRatingRepository {
    async fn upsert(&self, rating: &NewRating) -> Result<UserRating, RatingError> {
        let now = Utc::now();
        let mut ratings = self.ratings.lock().unwrap();

        if let Some(existing) = ratings
            .iter_mut()
            .find(|r| r.user_id == rating.user_id.as_i64() && r.movie_id == rating.movie_id)
        {
            existing.rating = rating.rating;
            if let Some(review) = &rating.review {
                existing.review = Some(review.clone());
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let stored = UserRating {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: rating.user_id.as_i64(),
            movie_id: rating.movie_id,
            rating: rating.rating,
            review: rating.review.clone(),
            created_at: now,
            updated_at: now,
        };
        ratings.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserRating>, RatingError> {
        let mut ratings: Vec<UserRating> = self
            .ratings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id.as_i64())
            .cloned()
            .collect();

        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(ratings
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn delete(&self, user_id: UserId, movie_id: i64) -> Result<bool, RatingError> {
        let mut ratings = self.ratings.lock().unwrap();
        let before = ratings.len();
        ratings.retain(|r| !(r.user_id == user_id.as_i64() && r.movie_id == movie_id));
        Ok(ratings.len() < before)
    }
}
