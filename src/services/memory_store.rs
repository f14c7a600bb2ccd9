//! In-memory stores backing the unit and route tests.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{Movie, MovieFilter, Review, UpdateMovieRequest, User};
use crate::services::store::{MovieStore, ReviewStore, StoreError, StoreResult, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    movies: Mutex<Vec<Movie>>,
    reviews: Mutex<Vec<Review>>,
    calls: AtomicUsize,
    fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with a backend error
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    /// Number of store operations performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::Backend("store unavailable".to_string()));
        }
        Ok(())
    }
}

fn matches_filter(filter: &MovieFilter, movie: &Movie) -> bool {
    filter.id.map_or(true, |id| movie.id == Some(id))
        && filter.title.as_ref().map_or(true, |t| &movie.title == t)
        && filter.release_date.map_or(true, |y| movie.release_date == y)
        && filter.genre.as_ref().map_or(true, |g| &movie.genre == g)
        && filter.actor.as_ref().map_or(true, |a| movie.actors.contains(a))
        && filter.image_url.as_ref().map_or(true, |u| movie.image_url.as_ref() == Some(u))
}

fn apply_patch(patch: &UpdateMovieRequest, movie: &mut Movie) {
    if let Some(title) = &patch.title {
        movie.title = title.clone();
    }
    if let Some(year) = patch.release_date {
        movie.release_date = year;
    }
    if let Some(genre) = &patch.genre {
        movie.genre = genre.clone();
    }
    if let Some(actors) = &patch.actors {
        movie.actors = actors.clone();
    }
    if let Some(url) = &patch.image_url {
        movie.image_url = Some(url.clone());
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.touch()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, mut user: User) -> StoreResult<User> {
        self.touch()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate);
        }
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn find_movies(&self, filter: &MovieFilter) -> StoreResult<Vec<Movie>> {
        self.touch()?;
        let movies = self.movies.lock().unwrap();
        Ok(movies.iter().filter(|m| matches_filter(filter, m)).cloned().collect())
    }

    async fn find_movie_by_id(&self, id: ObjectId) -> StoreResult<Option<Movie>> {
        self.touch()?;
        let movies = self.movies.lock().unwrap();
        Ok(movies.iter().find(|m| m.id == Some(id)).cloned())
    }

    async fn insert_movie(&self, mut movie: Movie) -> StoreResult<Movie> {
        self.touch()?;
        movie.id = Some(ObjectId::new());
        self.movies.lock().unwrap().push(movie.clone());
        Ok(movie)
    }

    async fn update_movie_by_title(
        &self,
        title: &str,
        patch: &UpdateMovieRequest,
    ) -> StoreResult<Option<Movie>> {
        self.touch()?;
        let mut movies = self.movies.lock().unwrap();
        Ok(movies.iter_mut().find(|m| m.title == title).map(|movie| {
            apply_patch(patch, movie);
            movie.clone()
        }))
    }

    async fn delete_movie_by_title(&self, title: &str) -> StoreResult<Option<Movie>> {
        self.touch()?;
        let mut movies = self.movies.lock().unwrap();
        let position = movies.iter().position(|m| m.title == title);
        Ok(position.map(|idx| movies.remove(idx)))
    }

    async fn search_movies(&self, query: &str) -> StoreResult<Vec<Movie>> {
        self.touch()?;
        let needle = query.to_lowercase();
        let movies = self.movies.lock().unwrap();
        Ok(movies
            .iter()
            .filter(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.actors.iter().any(|a| a.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn find_reviews(&self, movie_id: Option<ObjectId>) -> StoreResult<Vec<Review>> {
        self.touch()?;
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews
            .iter()
            .filter(|r| movie_id.map_or(true, |id| r.movie_id == id))
            .cloned()
            .collect())
    }

    async fn find_reviews_for_movies(&self, movie_ids: &[ObjectId]) -> StoreResult<Vec<Review>> {
        self.touch()?;
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews
            .iter()
            .filter(|r| movie_ids.contains(&r.movie_id))
            .cloned()
            .collect())
    }

    async fn insert_review(&self, mut review: Review) -> StoreResult<Review> {
        self.touch()?;
        review.id = Some(ObjectId::new());
        self.reviews.lock().unwrap().push(review.clone());
        Ok(review)
    }
}
