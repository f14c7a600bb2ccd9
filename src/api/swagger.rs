use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Movie Review Service API",
        version = "1.0.0",
        description = "Movies, reviews and average ratings.\n\n**Authentication:** sign in at `/signin` and send the returned token as `Authorization: JWT <token>` (the `Bearer` scheme is accepted too)."
    ),
    paths(
        // Auth endpoints
        crate::api::auth::signup,
        crate::api::auth::signin,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Movies
        crate::api::movies::list_movies,
        crate::api::movies::create_movie,
        crate::api::movies::update_movie,
        crate::api::movies::delete_movie,
        crate::api::movies::get_movie,
        crate::api::movies::search_movies,

        // Reviews
        crate::api::reviews::list_reviews,
        crate::api::reviews::create_review,
    ),
    components(
        schemas(
            crate::models::SignupRequest,
            crate::models::SignupResponse,
            crate::models::SigninRequest,
            crate::models::SigninResponse,
            crate::models::CreateMovieRequest,
            crate::models::UpdateMovieRequest,
            crate::models::SearchRequest,
            crate::models::MovieResponse,
            crate::models::RatedMovieResponse,
            crate::models::CreateReviewRequest,
            crate::models::ReviewResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Signup and signin. Signin returns the token used by every other route."),
        (name = "Movies", description = "Movie CRUD, search and rating aggregation."),
        (name = "Reviews", description = "Movie reviews."),
        (name = "Health", description = "Health check and request counters."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // The token goes in verbatim, scheme prefix included
            components.add_security_scheme(
                "jwt_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "JWT <token> as returned by /signin",
                ))),
            );
        }
    }
}
