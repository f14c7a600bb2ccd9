pub mod auth;
pub mod health;
pub mod metrics;
pub mod movies;
pub mod reviews;
pub mod swagger;

use actix_web::web;

use crate::middleware::AuthMiddleware;
use crate::services::auth_service::Authenticator;
use crate::utils::AppError;

/// Registers every route. Everything but signup/signin and the health
/// endpoints sits behind `AuthMiddleware`.
pub fn configure(cfg: &mut web::ServiceConfig, authenticator: &Authenticator) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid JSON body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid query string: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid path: {}", err)).into()
    }))
    // Health check
    .route("/health", web::get().to(health::health_check))
    // Metrics
    .route("/metrics", web::get().to(metrics::get_metrics))
    // Auth endpoints
    .route("/signup", web::post().to(auth::signup))
    .route("/signin", web::post().to(auth::signin))
    .service(
        web::scope("/movies")
            .wrap(AuthMiddleware::new(authenticator.clone()))
            .route("", web::get().to(movies::list_movies))
            .route("", web::post().to(movies::create_movie))
            .route("", web::put().to(movies::update_movie))
            .route("", web::delete().to(movies::delete_movie))
            .route("/search", web::post().to(movies::search_movies))
            .route("/{id}", web::get().to(movies::get_movie)),
    );

    // Historical capitalised path plus the lowercase form
    for path in ["/Reviews", "/reviews"] {
        cfg.service(
            web::scope(path)
                .wrap(AuthMiddleware::new(authenticator.clone()))
                .route("", web::get().to(reviews::list_reviews))
                .route("", web::post().to(reviews::create_review)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::SecurityHeaders;
    use crate::services::auth_service::Claims;
    use crate::services::memory_store::MemoryStore;
    use crate::state::AppState;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn test_state(store: &Arc<MemoryStore>) -> AppState {
        AppState {
            users: store.clone(),
            movies: store.clone(),
            reviews: store.clone(),
            authenticator: Authenticator::new("route-test-secret", 1),
            bcrypt_cost: 4,
        }
    }

    macro_rules! test_app {
        ($state:expr) => {{
            let state: AppState = $state;
            let authenticator = state.authenticator.clone();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .wrap(SecurityHeaders)
                    .configure(|cfg| configure(cfg, &authenticator)),
            )
            .await
        }};
    }

    macro_rules! sign_in {
        ($app:expr, $username:expr) => {{
            let req = test::TestRequest::post()
                .uri("/signup")
                .set_json(json!({ "name": "Tester", "username": $username, "password": "hunter2" }))
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);

            let req = test::TestRequest::post()
                .uri("/signin")
                .set_json(json!({ "username": $username, "password": "hunter2" }))
                .to_request();
            let body: Value = test::call_and_read_body_json(&$app, req).await;
            assert_eq!(body["success"], true);
            body["token"].as_str().unwrap().to_string()
        }};
    }

    fn expired_token() -> String {
        let past = (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp() as usize;
        let claims = Claims {
            id: mongodb::bson::oid::ObjectId::new().to_hex(),
            username: "ripley".into(),
            iat: past,
            exp: past,
            jti: uuid::Uuid::new_v4().to_string(),
        };
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret("route-test-secret".as_bytes()),
        )
        .unwrap()
    }

    fn movie_body(title: &str) -> Value {
        json!({
            "title": title,
            "releaseDate": 1979,
            "genre": "Science Fiction",
            "actors": ["Sigourney Weaver", "Tom Skerritt", "John Hurt"]
        })
    }

    #[actix_web::test]
    async fn protected_routes_reject_before_touching_the_store() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(test_state(&store));

        let requests = vec![
            test::TestRequest::get().uri("/movies").to_request(),
            test::TestRequest::post().uri("/movies").set_json(movie_body("Alien")).to_request(),
            test::TestRequest::put().uri("/movies?title=Alien").set_json(json!({"genre": "Horror"})).to_request(),
            test::TestRequest::delete().uri("/movies?title=Alien").to_request(),
            test::TestRequest::get().uri(&format!("/movies/{}", mongodb::bson::oid::ObjectId::new())).to_request(),
            test::TestRequest::post().uri("/movies/search").set_json(json!({"query": "alien"})).to_request(),
            test::TestRequest::get().uri("/Reviews").to_request(),
            test::TestRequest::post()
                .uri("/Reviews")
                .set_json(json!({
                    "movieId": mongodb::bson::oid::ObjectId::new().to_hex(),
                    "username": "ripley",
                    "review": "Game over",
                    "rating": 5
                }))
                .to_request(),
            test::TestRequest::get()
                .uri("/movies")
                .insert_header((header::AUTHORIZATION, format!("JWT {}", expired_token())))
                .to_request(),
            test::TestRequest::get()
                .uri("/movies")
                .insert_header((header::AUTHORIZATION, "JWT not.a.token"))
                .to_request(),
            test::TestRequest::get()
                .uri("/reviews")
                .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
                .to_request(),
        ];

        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "auth-failure");
        }

        assert_eq!(store.calls(), 0);
    }

    #[actix_web::test]
    async fn duplicate_signup_is_a_conflict() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(test_state(&store));
        let payload = json!({ "name": "Ellen", "username": "ripley", "password": "nostromo" });

        let req = test::TestRequest::post().uri("/signup").set_json(&payload).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);

        let req = test::TestRequest::post().uri("/signup").set_json(&payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "duplicate");
    }

    #[actix_web::test]
    async fn signin_with_wrong_password_is_unauthorized() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(test_state(&store));
        sign_in!(app, "dallas");

        let req = test::TestRequest::post()
            .uri("/signin")
            .set_json(json!({ "username": "dallas", "password": "wrong" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/signin")
            .set_json(json!({ "username": "kane", "password": "hunter2" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn movie_review_flow_computes_average_rating() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(test_state(&store));
        let token = sign_in!(app, "ash");

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .set_json(movie_body("Alien"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let alien_id = body["movie"]["_id"].as_str().unwrap().to_string();
        assert_eq!(body["movie"]["title"], "Alien");
        assert_eq!(body["movie"]["releaseDate"], 1979);
        assert_eq!(body["movie"]["actors"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .set_json(movie_body("Aliens"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        for rating in [3, 5] {
            let req = test::TestRequest::post()
                .uri("/Reviews")
                .insert_header((header::AUTHORIZATION, token.as_str()))
                .set_json(json!({
                    "movieId": alien_id,
                    "username": "ash",
                    "review": "In space no one can hear you scream",
                    "rating": rating
                }))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["message"], "Review created!");
        }

        let req = test::TestRequest::get()
            .uri(&format!("/movies/{}?reviews=true", alien_id))
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["avgRating"], 4.0);
        assert_eq!(body["reviews"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::get()
            .uri(&format!("/movies/{}?reviews=1", alien_id))
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["avgRating"], 4.0);

        let req = test::TestRequest::get()
            .uri(&format!("/movies/{}?reviews=maybe", alien_id))
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/movies?reviews=true&sort=rating")
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let listed = body.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["title"], "Alien");
        assert_eq!(listed[0]["avgRating"], 4.0);
        assert!(listed[1]["avgRating"].is_null());

        let req = test::TestRequest::get()
            .uri(&format!("/Reviews?movieId={}", alien_id))
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn movie_validation_and_not_found_paths() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(test_state(&store));
        let token = sign_in!(app, "bishop");
        let auth = (header::AUTHORIZATION, token.as_str());

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header(auth.clone())
            .set_json(json!({ "title": "Short", "releaseDate": 2001, "genre": "Drama", "actors": ["One", "Two"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/movies?title=Alien")
            .insert_header(auth.clone())
            .set_json(movie_body("Alien"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri("/movies")
            .insert_header(auth.clone())
            .set_json(json!({ "genre": "Horror" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri("/movies?title=Nope")
            .insert_header(auth.clone())
            .set_json(json!({ "genre": "Horror" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri("/movies?title=Nope")
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/movies/not-an-object-id")
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/movies?genre=Western")
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn update_then_delete_by_title() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(test_state(&store));
        let token = sign_in!(app, "parker");
        let auth = (header::AUTHORIZATION, token.as_str());

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header(auth.clone())
            .set_json(movie_body("Alien"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri("/movies?title=Alien")
            .insert_header(auth.clone())
            .set_json(json!({ "genre": "Horror", "imageUrl": "https://img.example/alien.jpg" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["movie"]["genre"], "Horror");
        assert_eq!(body["movie"]["imageUrl"], "https://img.example/alien.jpg");
        assert_eq!(body["movie"]["releaseDate"], 1979);

        let req = test::TestRequest::delete()
            .uri("/movies?title=Alien")
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/movies?title=Alien")
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn search_orders_by_rating() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(test_state(&store));
        let token = sign_in!(app, "lambert");
        let auth = (header::AUTHORIZATION, token.as_str());

        let mut ids = Vec::new();
        for title in ["Alien", "Alien 3", "Blade Runner"] {
            let req = test::TestRequest::post()
                .uri("/movies")
                .insert_header(auth.clone())
                .set_json(movie_body(title))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            ids.push(body["movie"]["_id"].as_str().unwrap().to_string());
        }

        let req = test::TestRequest::post()
            .uri("/Reviews")
            .insert_header(auth.clone())
            .set_json(json!({ "movieId": ids[1], "username": "lambert", "review": "better than expected", "rating": 4.5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/movies/search")
            .insert_header(auth.clone())
            .set_json(json!({ "query": "ALIEN" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Alien 3", "Alien"]);
    }

    #[actix_web::test]
    async fn malformed_bodies_and_store_failures_render_json() {
        let store = Arc::new(MemoryStore::failing());
        let app = test_app!(test_state(&store));

        let req = test::TestRequest::post()
            .uri("/signup")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers().get("x-content-type-options").unwrap(), "nosniff");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation");

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "username": "hicks", "password": "pw" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[actix_web::test]
    async fn health_is_public() {
        let store = Arc::new(MemoryStore::new());
        let app = test_app!(test_state(&store));

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
    }
}
