//! Movie/review join and average rating.
//!
//! Evaluated on every request; nothing here is cached.

use mongodb::bson::oid::ObjectId;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Movie, RatedMovie, Review};
use crate::services::store::{ReviewStore, StoreResult};

/// Arithmetic mean of the ratings, `None` for an empty slice
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    // Scale before summing; ratings are unbounded and the total may overflow
    let count = reviews.len() as f64;
    Some(reviews.iter().map(|r| r.rating / count).sum())
}

/// Joins each movie with the reviews referencing its id. Reviews pointing at
/// movies outside `movies` are dropped.
pub fn join_reviews(movies: Vec<Movie>, reviews: Vec<Review>) -> Vec<RatedMovie> {
    let mut by_movie: HashMap<ObjectId, Vec<Review>> = HashMap::new();
    for review in reviews {
        by_movie.entry(review.movie_id).or_default().push(review);
    }

    movies
        .into_iter()
        .map(|movie| {
            let reviews = movie
                .id
                .and_then(|id| by_movie.remove(&id))
                .unwrap_or_default();
            let avg_rating = average_rating(&reviews);
            RatedMovie { movie, reviews, avg_rating }
        })
        .collect()
}

/// Highest average first. Unrated movies go last; ties keep their input order.
pub fn sort_by_rating(movies: &mut [RatedMovie]) {
    movies.sort_by(|a, b| compare_ratings(a.avg_rating, b.avg_rating));
}

fn compare_ratings(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Fetches the reviews for `movies` and joins them
pub async fn with_ratings(
    reviews: &dyn ReviewStore,
    movies: Vec<Movie>,
) -> StoreResult<Vec<RatedMovie>> {
    if movies.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<ObjectId> = movies.iter().filter_map(|m| m.id).collect();
    let joined = reviews.find_reviews_for_movies(&ids).await?;

    log::debug!("🔗 Joined {} reviews onto {} movies", joined.len(), movies.len());

    Ok(join_reviews(movies, joined))
}
