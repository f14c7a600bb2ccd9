use actix_web::{web, HttpResponse};

use crate::models::{SigninRequest, SigninResponse, SignupRequest, SignupResponse};
use crate::services::auth_service;
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created", body = SignupResponse),
        (status = 400, description = "Missing username or password"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn signup(
    state: web::Data<AppState>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let username = request.username.clone().unwrap_or_default();
    log::info!("📝 POST /signup - username: {}", username);

    match auth_service::signup(state.users.as_ref(), request, state.bcrypt_cost).await {
        Ok(_) => {
            log::info!("✅ Signup successful: {}", username);
            Ok(HttpResponse::Ok().json(SignupResponse {
                success: true,
                msg: "Successfully created new user.".to_string(),
            }))
        }
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {}", username, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/signin",
    tag = "Auth",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signin successful", body = SigninResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn signin(
    state: web::Data<AppState>,
    request: web::Json<SigninRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let username = request.username.clone().unwrap_or_default();
    log::info!("🔐 POST /signin - username: {}", username);

    let token = auth_service::signin(
        state.users.as_ref(),
        &state.authenticator,
        request,
        state.bcrypt_cost,
    )
    .await?;

    log::info!("✅ Signin successful: {}", username);
    Ok(HttpResponse::Ok().json(SigninResponse { success: true, token }))
}
