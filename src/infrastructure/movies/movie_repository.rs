//! SQLx implementation of the movie repository

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::movies::{
    entities::{Movie, MovieChanges, NewMovie},
    errors::MovieError,
    repositories::{IMovieRepository, MovieFilter},
};

const MOVIE_COLUMNS: &str = "id, title, original_title, overview, tagline, release_date, \
     runtime, vote_average, vote_count, popularity, budget, revenue, status, \
     original_language, genres, production_companies, production_countries, director, \
     \"cast\", adult, video, created_at, updated_at";

/// SQLx implementation of the movie repository
pub struct PgMovieRepository {
    pool: Arc<PgPool>,
}

impl PgMovieRepository {
    /// Create a new SQLx movie repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Raw database row for a movie
#[derive(sqlx::FromRow)]
struct MovieRow {
    id: i64,
    title: String,
    original_title: Option<String>,
    overview: Option<String>,
    tagline: Option<String>,
    release_date: Option<DateTime<Utc>>,
    runtime: Option<i32>,
    vote_average: f64,
    vote_count: i64,
    popularity: f64,
    budget: i64,
    revenue: i64,
    status: Option<String>,
    original_language: Option<String>,
    genres: Option<String>,
    production_companies: Option<String>,
    production_countries: Option<String>,
    director: Option<String>,
    cast: Option<String>,
    adult: bool,
    video: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            original_title: row.original_title,
            overview: row.overview,
            tagline: row.tagline,
            release_date: row.release_date,
            runtime: row.runtime,
            vote_average: row.vote_average,
            vote_count: row.vote_count,
            popularity: row.popularity,
            budget: row.budget,
            revenue: row.revenue,
            status: row.status,
            original_language: row.original_language,
            genres: row.genres,
            production_companies: row.production_companies,
            production_countries: row.production_countries,
            director: row.director,
            cast: row.cast,
            adult: row.adult,
            video: row.video,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn database_error(context: &str, e: sqlx::Error) -> MovieError {
    tracing::error!("Database error {}: {}", context, e);
    MovieError::Database {
        message: e.to_string(),
    }
}

/// Wrap a term for a LIKE match
fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

#[async_trait]
impl IMovieRepository for PgMovieRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, MovieError> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| database_error("finding movie by id", e))?;

        Ok(row.map(Movie::from))
    }

    async fn search(&self, filter: &MovieFilter) -> Result<Vec<Movie>, MovieError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE 1=1"));

        if let Some(query) = filter.query.as_deref().filter(|q| !q.trim().is_empty()) {
            let pattern = like_pattern(query.trim());
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR overview ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR \"cast\" ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR director ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        for genre in &filter.genres {
            builder.push(" AND genres ILIKE ");
            builder.push_bind(like_pattern(genre));
        }

        if let Some(min_rating) = filter.min_rating {
            builder.push(" AND vote_average >= ");
            builder.push_bind(min_rating);
        }

        if let Some(max_runtime) = filter.max_runtime {
            builder.push(" AND runtime <= ");
            builder.push_bind(max_runtime);
        }

        // Years are range-checked upstream; single() is None only outside
        // chrono's representable range
        if let Some(start) = filter
            .year_from
            .and_then(|y| Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).single())
        {
            builder.push(" AND release_date >= ");
            builder.push_bind(start);
        }

        if let Some(end) = filter
            .year_to
            .and_then(|y| Utc.with_ymd_and_hms(y, 12, 31, 23, 59, 59).single())
        {
            builder.push(" AND release_date <= ");
            builder.push_bind(end);
        }

        if !filter.include_adult {
            builder.push(" AND adult = FALSE");
        }

        builder.push(" ORDER BY popularity DESC OFFSET ");
        builder.push_bind(filter.offset);
        builder.push(" LIMIT ");
        builder.push_bind(filter.limit);

        let rows = builder
            .build_query_as::<MovieRow>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| database_error("searching movies", e))?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn popular(&self, limit: i64, offset: i64) -> Result<Vec<Movie>, MovieError> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE adult = FALSE \
             ORDER BY popularity DESC OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| database_error("listing popular movies", e))?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn trending(&self, min_popularity: f64, limit: i64) -> Result<Vec<Movie>, MovieError> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies \
             WHERE adult = FALSE AND release_date IS NOT NULL AND popularity > $1 \
             ORDER BY popularity DESC LIMIT $2"
        ))
        .bind(min_popularity)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| database_error("listing trending movies", e))?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn by_genre(
        &self,
        genre: &str,
        min_vote_count: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, MovieError> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies \
             WHERE adult = FALSE AND genres ILIKE $1 AND vote_count >= $2 \
             ORDER BY popularity DESC LIMIT $3"
        ))
        .bind(like_pattern(genre))
        .bind(min_vote_count)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| database_error("listing movies by genre", e))?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn by_director(&self, director: &str, limit: i64) -> Result<Vec<Movie>, MovieError> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies \
             WHERE adult = FALSE AND director ILIKE $1 \
             ORDER BY popularity DESC LIMIT $2"
        ))
        .bind(like_pattern(director))
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| database_error("listing movies by director", e))?;

        Ok(rows.into_iter().map(Movie::from).collect())
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

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE adult = FALSE AND id <> "
        ));
        builder.push_bind(exclude_id);
        builder.push(" AND (");
        for (i, genre) in genres.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder.push("genres ILIKE ");
            builder.push_bind(like_pattern(genre));
        }
        builder.push(") ORDER BY popularity DESC LIMIT ");
        builder.push_bind(limit);

        let rows = builder
            .build_query_as::<MovieRow>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| database_error("listing movies by shared genres", e))?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn insert(&self, new_movie: &NewMovie) -> Result<Movie, MovieError> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "INSERT INTO movies (title, original_title, overview, tagline, release_date, \
             runtime, vote_average, vote_count, popularity, budget, revenue, status, \
             original_language, genres, production_companies, production_countries, director, \
             \"cast\", adult, video) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20) \
             RETURNING {MOVIE_COLUMNS}"
        ))
        .bind(&new_movie.title)
        .bind(&new_movie.original_title)
        .bind(&new_movie.overview)
        .bind(&new_movie.tagline)
        .bind(new_movie.release_date)
        .bind(new_movie.runtime)
        .bind(new_movie.vote_average)
        .bind(new_movie.vote_count)
        .bind(new_movie.popularity)
        .bind(new_movie.budget)
        .bind(new_movie.revenue)
        .bind(&new_movie.status)
        .bind(&new_movie.original_language)
        .bind(&new_movie.genres)
        .bind(&new_movie.production_companies)
        .bind(&new_movie.production_countries)
        .bind(&new_movie.director)
        .bind(&new_movie.cast)
        .bind(new_movie.adult)
        .bind(new_movie.video)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| database_error("inserting movie", e))?;

        Ok(Movie::from(row))
    }

    async fn update(&self, id: i64, changes: &MovieChanges) -> Result<Option<Movie>, MovieError> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "UPDATE movies SET \
             title = COALESCE($2, title), \
             original_title = COALESCE($3, original_title), \
             overview = COALESCE($4, overview), \
             tagline = COALESCE($5, tagline), \
             release_date = COALESCE($6, release_date), \
             runtime = COALESCE($7, runtime), \
             vote_average = COALESCE($8, vote_average), \
             vote_count = COALESCE($9, vote_count), \
             popularity = COALESCE($10, popularity), \
             budget = COALESCE($11, budget), \
             revenue = COALESCE($12, revenue), \
             status = COALESCE($13, status), \
             original_language = COALESCE($14, original_language), \
             genres = COALESCE($15, genres), \
             production_companies = COALESCE($16, production_companies), \
             production_countries = COALESCE($17, production_countries), \
             director = COALESCE($18, director), \
             \"cast\" = COALESCE($19, \"cast\"), \
             adult = COALESCE($20, adult), \
             video = COALESCE($21, video), \
             updated_at = now() \
             WHERE id = $1 \
             RETURNING {MOVIE_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.original_title)
        .bind(&changes.overview)
        .bind(&changes.tagline)
        .bind(changes.release_date)
        .bind(changes.runtime)
        .bind(changes.vote_average)
        .bind(changes.vote_count)
        .bind(changes.popularity)
        .bind(changes.budget)
        .bind(changes.revenue)
        .bind(&changes.status)
        .bind(&changes.original_language)
        .bind(&changes.genres)
        .bind(&changes.production_companies)
        .bind(&changes.production_countries)
        .bind(&changes.director)
        .bind(&changes.cast)
        .bind(changes.adult)
        .bind(changes.video)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| database_error("updating movie", e))?;

        Ok(row.map(Movie::from))
    }
}
