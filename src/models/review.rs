use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Review record (stored in the `reviews` collection). Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub movie_id: ObjectId,
    pub username: String,
    pub review: String,
    pub rating: f64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub movie_id: Option<String>,
    pub username: Option<String>,
    pub review: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub movie_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub movie_id: String,
    pub username: String,
    pub review: String,
    pub rating: f64,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        ReviewResponse {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            movie_id: review.movie_id.to_hex(),
            username: review.username,
            review: review.review,
            rating: review.rating,
        }
    }
}
