//! Movie catalog entities and the popularity scoring formula

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Movie aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Unique movie identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// Title in the original language
    pub original_title: Option<String>,
    /// Plot synopsis
    pub overview: Option<String>,
    /// Marketing tagline
    pub tagline: Option<String>,
    /// Theatrical release date
    pub release_date: Option<DateTime<Utc>>,
    /// Runtime in minutes
    pub runtime: Option<i32>,
    /// Average vote on a 0-10 scale
    pub vote_average: f64,
    /// Number of votes backing the average
    pub vote_count: i64,
    /// Upstream popularity metric
    pub popularity: f64,
    /// Production budget in dollars
    pub budget: i64,
    /// Gross revenue in dollars
    pub revenue: i64,
    /// Release status (Released, Post Production, ...)
    pub status: Option<String>,
    /// ISO 639-1 code of the original language
    pub original_language: Option<String>,
    /// Genres, comma-separated
    pub genres: Option<String>,
    /// Production companies, comma-separated
    pub production_companies: Option<String>,
    /// Production countries, comma-separated
    pub production_countries: Option<String>,
    /// Director name
    pub director: Option<String>,
    /// Main cast, comma-separated
    pub cast: Option<String>,
    /// Whether this is an adult title
    pub adult: bool,
    /// Whether this is a direct-to-video release
    pub video: bool,
    /// Row creation timestamp
    pub created_at: DateTime<Utc>,
    /// Row update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Popularity score used to rank and annotate recommendations.
    ///
    /// Combines the upstream popularity metric with a vote-weighted rating,
    /// a recency bonus that decays over ten years, and a capped
    /// return-on-investment bonus. Absent inputs fall back to neutral values;
    /// scoring never decides inclusion, only ordering and display.
    pub fn popularity_score(&self) -> f64 {
        let base_score = self.popularity;

        // Weight the vote average by how many votes back it, saturating at 1000
        let vote_score = self.vote_average * f64::min(self.vote_count as f64 / 1000.0, 1.0);

        let recency_bonus = match self.release_date {
            Some(release_date) => {
                let years_old = (Utc::now() - release_date).num_days() as f64 / 365.0;
                f64::max(0.0, 1.0 - years_old / 10.0)
            }
            None => 0.5,
        };

        let financial_bonus = if self.budget > 0 && self.revenue > 0 {
            let roi = (self.revenue - self.budget) as f64 / self.budget as f64;
            f64::min(roi / 10.0, 1.0)
        } else {
            0.0
        };

        base_score + vote_score + recency_bonus * 0.5 + financial_bonus * 0.3
    }

    /// Split the comma-separated genres field into trimmed names
    pub fn genre_list(&self) -> Vec<String> {
        self.genres
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect()
    }
}

/// A movie annotated with its recommendation score and rationale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMovie {
    pub movie: Movie,
    pub score: f64,
    pub reason: String,
}

impl ScoredMovie {
    /// Score a movie and attach the human-readable reason
    pub fn new(movie: Movie, reason: String) -> Self {
        let score = movie.popularity_score();
        Self {
            movie,
            score,
            reason,
        }
    }
}

/// Data for creating a new movie; the repository assigns the id
#[derive(Debug, Clone, Default)]
pub struct NewMovie {
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub runtime: Option<i32>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub budget: i64,
    pub revenue: i64,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub genres: Option<String>,
    pub production_companies: Option<String>,
    pub production_countries: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub adult: bool,
    pub video: bool,
}

/// Partial update for an existing movie; None fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub runtime: Option<i32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub genres: Option<String>,
    pub production_companies: Option<String>,
    pub production_countries: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub adult: Option<bool>,
    pub video: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_movie() -> Movie {
        let now = Utc::now();
        Movie {
            id: 1,
            title: "Test Movie".to_string(),
            original_title: None,
            overview: None,
            tagline: None,
            release_date: None,
            runtime: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            budget: 0,
            revenue: 0,
            status: None,
            original_language: None,
            genres: None,
            production_companies: None,
            production_countries: None,
            director: None,
            cast: None,
            adult: false,
            video: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_score_without_release_date_is_base_plus_votes_plus_quarter() {
        let mut movie = base_movie();
        movie.popularity = 12.0;
        movie.vote_average = 8.0;
        movie.vote_count = 500;

        // recency bonus is 0.5 when the release date is unknown, weighted 0.5
        let expected = 12.0 + 8.0 * 0.5 + 0.25;
        assert!((movie.popularity_score() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_score_monotone_in_popularity() {
        let mut low = base_movie();
        low.popularity = 1.0;
        let mut high = base_movie();
        high.popularity = 2.0;
        assert!(high.popularity_score() > low.popularity_score());
    }

    #[test]
    fn test_score_monotone_in_vote_average() {
        let mut low = base_movie();
        low.vote_average = 5.0;
        low.vote_count = 2000;
        let mut high = low.clone();
        high.vote_average = 9.0;
        assert!(high.popularity_score() > low.popularity_score());
    }

    #[test]
    fn test_vote_component_saturates_at_thousand_votes() {
        let mut movie = base_movie();
        movie.vote_average = 7.0;
        movie.vote_count = 1000;
        let score_at_cap = movie.popularity_score();

        movie.vote_count = 50_000;
        assert!((movie.popularity_score() - score_at_cap).abs() < 1e-9);
    }

    #[test]
    fn test_recent_release_scores_higher_than_old() {
        let mut recent = base_movie();
        recent.release_date = Some(Utc::now() - Duration::days(30));
        let mut old = base_movie();
        old.release_date = Some(Utc::now() - Duration::days(365 * 20));

        assert!(recent.popularity_score() > old.popularity_score());
        // a twenty-year-old release gets no recency bonus at all
        assert!(old.popularity_score().abs() < 1e-9);
    }

    #[test]
    fn test_financial_bonus_capped_at_one() {
        let mut movie = base_movie();
        movie.budget = 1_000_000;
        movie.revenue = 1_000_000_000;

        // ROI of 999 caps the bonus at 1.0, weighted 0.3; no-date recency adds 0.25
        let expected = 0.25 + 0.3;
        assert!((movie.popularity_score() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_budget_gets_no_financial_bonus() {
        let mut movie = base_movie();
        movie.budget = 0;
        movie.revenue = 5_000_000;
        assert!((movie.popularity_score() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_genre_list_splits_and_trims() {
        let mut movie = base_movie();
        movie.genres = Some("Action, Drama ,Sci-Fi".to_string());
        assert_eq!(movie.genre_list(), vec!["Action", "Drama", "Sci-Fi"]);

        movie.genres = None;
        assert!(movie.genre_list().is_empty());
    }

    #[test]
    fn test_scored_movie_carries_reason() {
        let mut movie = base_movie();
        movie.popularity = 3.0;
        let scored = ScoredMovie::new(movie, "Popular Action movie".to_string());
        assert_eq!(scored.reason, "Popular Action movie");
        assert!((scored.score - (3.0 + 0.25)).abs() < 1e-9);
    }
}
