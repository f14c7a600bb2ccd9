mod movies;
mod reviews;
mod users;

use mongodb::{Client, Collection, Database};
use std::error::Error;

pub const USERS: &str = "users";
pub const MOVIES: &str = "movies";
pub const REVIEWS: &str = "reviews";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let db_name = database_name(uri);
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the stores rely on. The unique username index is
    /// what turns a second signup into a duplicate key error.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(USERS);
        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        // A failure here would silently allow duplicate usernames
        users.create_index(username_index).await?;
        log::info!("   ✅ Index created: users(username) unique");

        let movies = self.collection::<mongodb::bson::Document>(MOVIES);
        let title_index = IndexModel::builder().keys(doc! { "title": 1 }).build();

        match movies.create_index(title_index).await {
            Ok(_) => log::info!("   ✅ Index created: movies(title)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let reviews = self.collection::<mongodb::bson::Document>(REVIEWS);
        let movie_index = IndexModel::builder().keys(doc! { "movieId": 1 }).build();

        match reviews.create_index(movie_index).await {
            Ok(_) => log::info!("   ✅ Index created: reviews(movieId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

}

/// Database name from the URI path, e.g. `mongodb://host:27017/movies?retryWrites=true`
fn database_name(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or("movies")
        .to_string()
}
