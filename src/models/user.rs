use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User record as stored in the `users` collection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: Option<String>,
    pub username: String,
    /// bcrypt hash, never the plaintext
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SigninRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SignupResponse {
    pub success: bool,
    pub msg: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SigninResponse {
    pub success: bool,
    /// Prefixed with the `JWT ` scheme, ready for the Authorization header
    pub token: String,
}
