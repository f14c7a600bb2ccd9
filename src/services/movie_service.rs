use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;

use crate::models::{
    CreateMovieRequest, Movie, MovieFilter, MovieView, RatedMovieResponse, UpdateMovieRequest,
    MIN_ACTORS,
};
use crate::services::aggregation;
use crate::services::store::{MovieStore, ReviewStore};
use crate::utils::AppError;

/// How `GET /movies` should shape its result
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ListOptions {
    pub include_reviews: bool,
    pub sort_by_rating: bool,
}

impl ListOptions {
    fn needs_ratings(&self) -> bool {
        self.include_reviews || self.sort_by_rating
    }
}

pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::Validation(format!("Invalid {}", what)))
}

/// `true`/`1` or `false`/`0`
pub fn parse_flag(key: &str, value: &str) -> Result<bool, AppError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(AppError::Validation(format!("{} must be true or false", key))),
    }
}

/// Splits the query string of `GET /movies` into the field filter and the
/// listing options. Unknown keys are rejected.
pub fn parse_list_query(query: &HashMap<String, String>) -> Result<(MovieFilter, ListOptions), AppError> {
    let mut filter = MovieFilter::default();
    let mut options = ListOptions::default();

    for (key, value) in query {
        match key.as_str() {
            "reviews" => options.include_reviews = parse_flag(key, value)?,
            "sortByRating" => options.sort_by_rating = parse_flag(key, value)?,
            "sort" => match value.as_str() {
                "rating" | "avgRating" => options.sort_by_rating = true,
                other => {
                    return Err(AppError::Validation(format!("Unsupported sort: {}", other)));
                }
            },
            "_id" | "id" => filter.id = Some(parse_object_id(value, "movie ID")?),
            "title" => filter.title = Some(value.clone()),
            "releaseDate" => {
                let year = value.trim().parse().map_err(|_| {
                    AppError::Validation("releaseDate must be a year".to_string())
                })?;
                filter.release_date = Some(year);
            }
            "genre" => filter.genre = Some(value.clone()),
            "actors" | "actor" => filter.actor = Some(value.clone()),
            "imageUrl" => filter.image_url = Some(value.clone()),
            other => {
                return Err(AppError::Validation(format!("Unknown filter field: {}", other)));
            }
        }
    }

    Ok((filter, options))
}

pub async fn list_movies(
    movies: &dyn MovieStore,
    reviews: &dyn ReviewStore,
    filter: &MovieFilter,
    options: ListOptions,
) -> Result<Vec<MovieView>, AppError> {
    let found = movies.find_movies(filter).await?;

    if !filter.is_empty() && found.is_empty() {
        return Err(AppError::NotFound("No matching movies found".to_string()));
    }

    if !options.needs_ratings() {
        return Ok(found.into_iter().map(|m| MovieView::Plain(m.into())).collect());
    }

    let mut rated = aggregation::with_ratings(reviews, found).await?;
    if options.sort_by_rating {
        aggregation::sort_by_rating(&mut rated);
    }

    Ok(rated
        .into_iter()
        .map(|r| MovieView::Rated(RatedMovieResponse::new(r, options.include_reviews)))
        .collect())
}

fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Drops blank names and checks that enough actors remain
fn named_actors(actors: Vec<String>) -> Result<Vec<String>, AppError> {
    let named: Vec<String> = actors.into_iter().filter(|a| !a.trim().is_empty()).collect();
    if named.len() < MIN_ACTORS {
        return Err(AppError::Validation(format!(
            "At least {} actors are required",
            MIN_ACTORS
        )));
    }
    Ok(named)
}

pub async fn create_movie(movies: &dyn MovieStore, request: CreateMovieRequest) -> Result<Movie, AppError> {
    let missing = || {
        AppError::Validation(
            "Title, release date, genre, and at least 3 actors are required".to_string(),
        )
    };

    let title = required_text(request.title).ok_or_else(missing)?;
    let release_date = request.release_date.ok_or_else(missing)?;
    let genre = required_text(request.genre).ok_or_else(missing)?;
    let actors = named_actors(request.actors.ok_or_else(missing)?).map_err(|_| missing())?;

    let movie = Movie {
        id: None,
        title,
        release_date,
        genre,
        actors,
        image_url: required_text(request.image_url),
    };

    Ok(movies.insert_movie(movie).await?)
}

pub async fn update_movie(
    movies: &dyn MovieStore,
    title: Option<&str>,
    patch: &UpdateMovieRequest,
) -> Result<Movie, AppError> {
    let title = title.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
        AppError::Validation("Query string (title) is required for updating a movie.".to_string())
    })?;

    if patch.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    if matches!(&patch.title, Some(t) if t.trim().is_empty())
        || matches!(&patch.genre, Some(g) if g.trim().is_empty())
    {
        return Err(AppError::Validation("title and genre cannot be empty".to_string()));
    }
    let mut patch = patch.clone();
    if let Some(actors) = patch.actors.take() {
        patch.actors = Some(named_actors(actors)?);
    }

    movies
        .update_movie_by_title(title, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found.".to_string()))
}

pub async fn delete_movie(movies: &dyn MovieStore, title: Option<&str>) -> Result<Movie, AppError> {
    let title = title.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
        AppError::Validation("Query string (title) is required for deleting a movie.".to_string())
    })?;

    movies
        .delete_movie_by_title(title)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found.".to_string()))
}

pub async fn get_movie(
    movies: &dyn MovieStore,
    reviews: &dyn ReviewStore,
    raw_id: &str,
    include_reviews: bool,
) -> Result<MovieView, AppError> {
    let id = parse_object_id(raw_id, "movie ID")?;

    let movie = movies
        .find_movie_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    if !include_reviews {
        return Ok(MovieView::Plain(movie.into()));
    }

    let rated = aggregation::with_ratings(reviews, vec![movie])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    Ok(MovieView::Rated(RatedMovieResponse::new(rated, true)))
}

/// Title/actor search, joined with reviews and ordered by rating
pub async fn search_movies(
    movies: &dyn MovieStore,
    reviews: &dyn ReviewStore,
    query: Option<&str>,
) -> Result<Vec<RatedMovieResponse>, AppError> {
    let query = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Search query is required".to_string()))?;

    let found = movies.search_movies(query).await?;
    let mut rated = aggregation::with_ratings(reviews, found).await?;
    aggregation::sort_by_rating(&mut rated);

    Ok(rated
        .into_iter()
        .map(|r| RatedMovieResponse::new(r, true))
        .collect())
}
