use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;

use super::{MongoDB, MOVIES};
use crate::models::{Movie, MovieFilter, UpdateMovieRequest};
use crate::services::store::{MovieStore, StoreResult};

fn filter_document(filter: &MovieFilter) -> Document {
    let mut document = Document::new();

    if let Some(id) = filter.id {
        document.insert("_id", id);
    }
    if let Some(title) = &filter.title {
        document.insert("title", title.as_str());
    }
    if let Some(release_date) = filter.release_date {
        document.insert("releaseDate", release_date);
    }
    if let Some(genre) = &filter.genre {
        document.insert("genre", genre.as_str());
    }
    // Equality against an array field matches any element
    if let Some(actor) = &filter.actor {
        document.insert("actors", actor.as_str());
    }
    if let Some(image_url) = &filter.image_url {
        document.insert("imageUrl", image_url.as_str());
    }

    document
}

fn set_document(patch: &UpdateMovieRequest) -> Document {
    let mut set = Document::new();

    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(release_date) = patch.release_date {
        set.insert("releaseDate", release_date);
    }
    if let Some(genre) = &patch.genre {
        set.insert("genre", genre.as_str());
    }
    if let Some(actors) = &patch.actors {
        set.insert("actors", actors.clone());
    }
    if let Some(image_url) = &patch.image_url {
        set.insert("imageUrl", image_url.as_str());
    }

    set
}

/// Escapes regex metacharacters so user input is matched literally
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$#-/".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn search_document(query: &str) -> Document {
    let pattern = escape_regex(query);
    doc! {
        "$or": [
            { "title": { "$regex": pattern.as_str(), "$options": "i" } },
            { "actors": { "$regex": pattern.as_str(), "$options": "i" } },
        ]
    }
}

#[async_trait]
impl MovieStore for MongoDB {
    async fn find_movies(&self, filter: &MovieFilter) -> StoreResult<Vec<Movie>> {
        let cursor = self
            .collection::<Movie>(MOVIES)
            .find(filter_document(filter))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_movie_by_id(&self, id: ObjectId) -> StoreResult<Option<Movie>> {
        Ok(self
            .collection::<Movie>(MOVIES)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn insert_movie(&self, mut movie: Movie) -> StoreResult<Movie> {
        let result = self.collection::<Movie>(MOVIES).insert_one(&movie).await?;
        movie.id = result.inserted_id.as_object_id();
        Ok(movie)
    }

    async fn update_movie_by_title(
        &self,
        title: &str,
        patch: &UpdateMovieRequest,
    ) -> StoreResult<Option<Movie>> {
        Ok(self
            .collection::<Movie>(MOVIES)
            .find_one_and_update(doc! { "title": title }, doc! { "$set": set_document(patch) })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_movie_by_title(&self, title: &str) -> StoreResult<Option<Movie>> {
        Ok(self
            .collection::<Movie>(MOVIES)
            .find_one_and_delete(doc! { "title": title })
            .await?)
    }

    async fn search_movies(&self, query: &str) -> StoreResult<Vec<Movie>> {
        let cursor = self
            .collection::<Movie>(MOVIES)
            .find(search_document(query))
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
