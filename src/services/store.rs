//! Persistence seams. The MongoDB wrapper implements every trait here; tests
//! run against the in-memory implementation in `memory_store`.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};
use std::fmt;

use crate::models::{Movie, MovieFilter, Review, UpdateMovieRequest, User};
use crate::utils::AppError;

/// MongoDB's duplicate key error code
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug)]
pub enum StoreError {
    /// A unique index rejected the write
    Duplicate,
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Duplicate => write!(f, "duplicate key"),
            StoreError::Backend(msg) => write!(f, "store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
            if write_error.code == DUPLICATE_KEY_CODE {
                return StoreError::Duplicate;
            }
        }
        StoreError::Backend(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AppError::Duplicate("Record already exists".to_string()),
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Fails with `StoreError::Duplicate` when the username is taken
    async fn insert_user(&self, user: User) -> StoreResult<User>;
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn find_movies(&self, filter: &MovieFilter) -> StoreResult<Vec<Movie>>;

    async fn find_movie_by_id(&self, id: ObjectId) -> StoreResult<Option<Movie>>;

    async fn insert_movie(&self, movie: Movie) -> StoreResult<Movie>;

    /// Returns the updated record, or `None` when no movie has that title
    async fn update_movie_by_title(
        &self,
        title: &str,
        patch: &UpdateMovieRequest,
    ) -> StoreResult<Option<Movie>>;

    /// Returns the removed record, or `None` when no movie has that title
    async fn delete_movie_by_title(&self, title: &str) -> StoreResult<Option<Movie>>;

    /// Case-insensitive substring match on the title or any actor
    async fn search_movies(&self, query: &str) -> StoreResult<Vec<Movie>>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find_reviews(&self, movie_id: Option<ObjectId>) -> StoreResult<Vec<Review>>;

    /// Reviews referencing any of the given movies, in a single round trip
    async fn find_reviews_for_movies(&self, movie_ids: &[ObjectId]) -> StoreResult<Vec<Review>>;

    async fn insert_review(&self, review: Review) -> StoreResult<Review>;
}
