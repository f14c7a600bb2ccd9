use actix_web::{web, HttpResponse};

use crate::models::{CreateReviewRequest, ReviewQuery, ReviewResponse};
use crate::services::auth_service::Claims;
use crate::services::review_service;
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/Reviews",
    tag = "Reviews",
    params(("movieId" = Option<String>, Query, description = "Only reviews of this movie")),
    responses(
        (status = 200, description = "Reviews", body = [ReviewResponse]),
        (status = 400, description = "Invalid movie ID")
    ),
    security(("jwt_auth" = []))
)]
pub async fn list_reviews(
    state: web::Data<AppState>,
    query: web::Query<ReviewQuery>,
) -> Result<HttpResponse, AppError> {
    let reviews = review_service::list_reviews(state.reviews.as_ref(), query.movie_id.as_deref()).await?;

    let reviews: Vec<ReviewResponse> = reviews.into_iter().map(ReviewResponse::from).collect();
    Ok(HttpResponse::Ok().json(reviews))
}

#[utoipa::path(
    post,
    path = "/Reviews",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Missing or malformed fields")
    ),
    security(("jwt_auth" = []))
)]
pub async fn create_review(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    body: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    let review = review_service::create_review(state.reviews.as_ref(), body.into_inner()).await?;
    log::info!("📝 Review created by {} for movie {}", user.username, review.movie_id.to_hex());

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Review created!",
        "review": ReviewResponse::from(review)
    })))
}
