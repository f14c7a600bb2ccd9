use crate::models::{CreateReviewRequest, Review};
use crate::services::movie_service::parse_object_id;
use crate::services::store::ReviewStore;
use crate::utils::AppError;

pub async fn list_reviews(reviews: &dyn ReviewStore, movie_id: Option<&str>) -> Result<Vec<Review>, AppError> {
    let movie_id = match movie_id.filter(|id| !id.trim().is_empty()) {
        Some(raw) => Some(parse_object_id(raw, "movie ID")?),
        None => None,
    };

    Ok(reviews.find_reviews(movie_id).await?)
}

/// Persists a review. The referenced movie is not looked up and the rating
/// is not range-checked.
pub async fn create_review(reviews: &dyn ReviewStore, request: CreateReviewRequest) -> Result<Review, AppError> {
    let missing = || AppError::Validation("movieId, username, review and rating are required".to_string());

    let movie_id = request.movie_id.ok_or_else(missing)?;
    let movie_id = parse_object_id(&movie_id, "movie ID")?;
    let username = request.username.filter(|u| !u.trim().is_empty()).ok_or_else(missing)?;
    let text = request.review.filter(|r| !r.trim().is_empty()).ok_or_else(missing)?;
    let rating = request.rating.ok_or_else(missing)?;
    if !rating.is_finite() {
        return Err(AppError::Validation("rating must be a number".to_string()));
    }

    let review = Review {
        id: None,
        movie_id,
        username,
        review: text,
        rating,
    };

    Ok(reviews.insert_review(review).await?)
}
