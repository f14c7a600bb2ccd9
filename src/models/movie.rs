use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::review::{Review, ReviewResponse};

/// Minimum number of actors a movie needs at creation time
pub const MIN_ACTORS: usize = 3;

/// Movie record (stored in the `movies` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    /// Release year
    pub release_date: i32,
    pub genre: String,
    pub actors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body of `POST /movies`. Every field is optional at the wire level so that
/// missing fields surface as a validation error instead of a parse error.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<i32>,
    pub genre: Option<String>,
    pub actors: Option<Vec<String>>,
    pub image_url: Option<String>,
}

/// Partial update applied by `PUT /movies?title=X`
#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<i32>,
    pub genre: Option<String>,
    pub actors: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl UpdateMovieRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.release_date.is_none()
            && self.genre.is_none()
            && self.actors.is_none()
            && self.image_url.is_none()
    }
}

/// Field/value filter for `GET /movies?field=value`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MovieFilter {
    pub id: Option<ObjectId>,
    pub title: Option<String>,
    pub release_date: Option<i32>,
    pub genre: Option<String>,
    /// Matches movies whose actor list contains this name
    pub actor: Option<String>,
    pub image_url: Option<String>,
}

impl MovieFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Search body for `POST /movies/search`
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    pub query: Option<String>,
}

/// Movie joined with its reviews and the derived average rating
#[derive(Debug, Clone)]
pub struct RatedMovie {
    pub movie: Movie,
    pub reviews: Vec<Review>,
    /// `None` when the movie has no reviews
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub release_date: i32,
    pub genre: String,
    pub actors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        MovieResponse {
            id: movie.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: movie.title,
            release_date: movie.release_date,
            genre: movie.genre,
            actors: movie.actors,
            image_url: movie.image_url,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatedMovieResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub release_date: i32,
    pub genre: String,
    pub actors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<ReviewResponse>>,
    /// Always present; `null` when there are no reviews
    pub avg_rating: Option<f64>,
}

impl RatedMovieResponse {
    pub fn new(rated: RatedMovie, include_reviews: bool) -> Self {
        let reviews = include_reviews.then(|| {
            rated
                .reviews
                .into_iter()
                .map(ReviewResponse::from)
                .collect()
        });
        let movie = rated.movie;

        RatedMovieResponse {
            id: movie.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: movie.title,
            release_date: movie.release_date,
            genre: movie.genre,
            actors: movie.actors,
            image_url: movie.image_url,
            reviews,
            avg_rating: rated.avg_rating,
        }
    }
}

/// A listed movie, with or without the rating join
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MovieView {
    Plain(MovieResponse),
    Rated(RatedMovieResponse),
}
