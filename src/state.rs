use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::MongoDB;
use crate::services::auth_service::Authenticator;
use crate::services::store::{MovieStore, ReviewStore, UserStore};

/// Shared, read-only handles built once at startup
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub movies: Arc<dyn MovieStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub authenticator: Authenticator,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(db: MongoDB, config: &AppConfig) -> Self {
        Self {
            users: Arc::new(db.clone()),
            movies: Arc::new(db.clone()),
            reviews: Arc::new(db),
            authenticator: Authenticator::from_config(config),
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}
