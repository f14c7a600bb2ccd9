use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use super::{MongoDB, REVIEWS};
use crate::models::Review;
use crate::services::store::{ReviewStore, StoreResult};

impl MongoDB {
    async fn collect_reviews(&self, filter: Document) -> StoreResult<Vec<Review>> {
        let cursor = self.collection::<Review>(REVIEWS).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl ReviewStore for MongoDB {
    async fn find_reviews(&self, movie_id: Option<ObjectId>) -> StoreResult<Vec<Review>> {
        let filter = match movie_id {
            Some(id) => doc! { "movieId": id },
            None => doc! {},
        };
        self.collect_reviews(filter).await
    }

    async fn find_reviews_for_movies(&self, movie_ids: &[ObjectId]) -> StoreResult<Vec<Review>> {
        let ids: Vec<Bson> = movie_ids.iter().map(|id| Bson::ObjectId(*id)).collect();
        self.collect_reviews(doc! { "movieId": { "$in": ids } }).await
    }

    async fn insert_review(&self, mut review: Review) -> StoreResult<Review> {
        let result = self.collection::<Review>(REVIEWS).insert_one(&review).await?;
        review.id = result.inserted_id.as_object_id();
        Ok(review)
    }
}
