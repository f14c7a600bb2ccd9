use async_trait::async_trait;
use mongodb::bson::doc;

use super::{MongoDB, USERS};
use crate::models::User;
use crate::services::store::{StoreResult, UserStore};

#[async_trait]
impl UserStore for MongoDB {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let collection = self.collection::<User>(USERS);
        Ok(collection.find_one(doc! { "username": username }).await?)
    }

    async fn insert_user(&self, mut user: User) -> StoreResult<User> {
        let collection = self.collection::<User>(USERS);
        let result = collection.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }
}
