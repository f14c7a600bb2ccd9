use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{SigninRequest, SignupRequest, User};
use crate::services::store::{StoreError, UserStore};
use crate::utils::AppError;

/// Scheme prefixed to issued tokens
pub const TOKEN_SCHEME: &str = "JWT";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub username: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String,
}

/// Issues and verifies signed tokens with the server-held secret.
#[derive(Clone)]
pub struct Authenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration: Duration,
}

impl Authenticator {
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            expiration: Duration::hours(expiration_hours),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiration_hours)
    }

    // Generate JWT token
    pub fn issue_token(&self, id: &str, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            id: id.to_string(),
            username: username.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.expiration).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature and expiry of a bare token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::AuthFailure(format!("Invalid token: {}", e)))
    }

    /// Verifies an `Authorization` header value of the form `JWT <token>` or
    /// `Bearer <token>`.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Claims, AppError> {
        let header = header
            .ok_or_else(|| AppError::AuthFailure("Missing authorization token".to_string()))?;

        let token = match header.trim().split_once(' ') {
            Some((scheme, token))
                if scheme.eq_ignore_ascii_case(TOKEN_SCHEME) || scheme.eq_ignore_ascii_case("Bearer") =>
            {
                token.trim()
            }
            _ => return Err(AppError::AuthFailure("Invalid token format".to_string())),
        };

        self.verify_token(token)
    }
}

/// Why a signin attempt was refused. Both cases are reported to the client as
/// the same authentication failure.
#[derive(Debug)]
pub enum SigninError {
    UnknownUser,
    PasswordMismatch,
    Other(AppError),
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing error: {}", e)))
}

async fn verify_password(password: String, hashed: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(password, &hashed))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))
}

// User registration
pub async fn signup(
    users: &dyn UserStore,
    request: SignupRequest,
    bcrypt_cost: u32,
) -> Result<User, AppError> {
    let (username, password) = match (required(request.username), required(request.password)) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            return Err(AppError::Validation(
                "Please include both username and password to signup.".to_string(),
            ))
        }
    };

    let user = User {
        id: None,
        name: request.name,
        username,
        password: hash_password(password, bcrypt_cost).await?,
    };

    users.insert_user(user).await.map_err(|e| match e {
        StoreError::Duplicate => {
            AppError::Duplicate("A user with that username already exists.".to_string())
        }
        other => other.into(),
    })
}

/// Looks the user up and compares the password against the stored hash.
/// Unknown usernames still pay for one hash at `bcrypt_cost`, so both refusals
/// take about as long.
pub async fn verify_credentials(
    users: &dyn UserStore,
    username: &str,
    password: String,
    bcrypt_cost: u32,
) -> Result<User, SigninError> {
    let user = match users
        .find_by_username(username)
        .await
        .map_err(|e| SigninError::Other(e.into()))?
    {
        Some(user) => user,
        None => {
            hash_password(password, bcrypt_cost).await.map_err(SigninError::Other)?;
            return Err(SigninError::UnknownUser);
        }
    };

    if verify_password(password, user.password.clone())
        .await
        .map_err(SigninError::Other)?
    {
        Ok(user)
    } else {
        Err(SigninError::PasswordMismatch)
    }
}

// User login, returns the token with its scheme prefix
pub async fn signin(
    users: &dyn UserStore,
    authenticator: &Authenticator,
    request: SigninRequest,
    bcrypt_cost: u32,
) -> Result<String, AppError> {
    let (username, password) = match (required(request.username), required(request.password)) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            return Err(AppError::Validation(
                "Please include both username and password to signin.".to_string(),
            ))
        }
    };

    let user = match verify_credentials(users, &username, password, bcrypt_cost).await {
        Ok(user) => user,
        Err(SigninError::UnknownUser) => {
            log::warn!("⚠️ Signin refused: unknown user {}", username);
            return Err(AppError::AuthFailure("Authentication failed.".to_string()));
        }
        Err(SigninError::PasswordMismatch) => {
            log::warn!("⚠️ Signin refused: password mismatch for {}", username);
            return Err(AppError::AuthFailure("Authentication failed.".to_string()));
        }
        Err(SigninError::Other(e)) => return Err(e),
    };

    let id = user
        .id
        .map(|id| id.to_hex())
        .ok_or_else(|| AppError::Internal(format!("User {} has no id", user.username)))?;

    let token = authenticator.issue_token(&id, &user.username)?;
    Ok(format!("{} {}", TOKEN_SCHEME, token))
}
