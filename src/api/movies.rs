use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{
    CreateMovieRequest, MovieResponse, RatedMovieResponse, SearchRequest, UpdateMovieRequest,
};
use crate::services::auth_service::Claims;
use crate::services::movie_service;
use crate::state::AppState;
use crate::utils::AppError;

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub reviews: Option<String>,
}

/// GET /movies - all movies, a field filter, or the rating join
#[utoipa::path(
    get,
    path = "/movies",
    tag = "Movies",
    params(
        ("reviews" = Option<bool>, Query, description = "Join reviews and average rating"),
        ("sort" = Option<String>, Query, description = "`rating` orders by average rating, highest first"),
        ("title" = Option<String>, Query, description = "Exact title"),
        ("genre" = Option<String>, Query, description = "Exact genre"),
        ("releaseDate" = Option<i32>, Query, description = "Release year"),
        ("actors" = Option<String>, Query, description = "Movies featuring this actor")
    ),
    responses(
        (status = 200, description = "Matching movies", body = [RatedMovieResponse]),
        (status = 400, description = "Unknown filter field"),
        (status = 404, description = "Filter matched nothing")
    ),
    security(("jwt_auth" = []))
)]
pub async fn list_movies(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let (filter, options) = movie_service::parse_list_query(&query)?;

    let movies = movie_service::list_movies(
        state.movies.as_ref(),
        state.reviews.as_ref(),
        &filter,
        options,
    )
    .await?;

    log::info!("🎬 GET /movies - {} movies (reviews: {}, sorted: {})",
        movies.len(), options.include_reviews, options.sort_by_rating);

    Ok(HttpResponse::Ok().json(movies))
}

#[utoipa::path(
    post,
    path = "/movies",
    tag = "Movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 200, description = "Movie saved", body = MovieResponse),
        (status = 400, description = "Missing fields or fewer than 3 actors")
    ),
    security(("jwt_auth" = []))
)]
pub async fn create_movie(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
    body: web::Json<CreateMovieRequest>,
) -> Result<HttpResponse, AppError> {
    if !query.is_empty() {
        return Err(AppError::Validation(
            "Query parameters are not allowed in POST request".to_string(),
        ));
    }

    let movie = movie_service::create_movie(state.movies.as_ref(), body.into_inner()).await?;
    log::info!("✅ Movie created by {}: {}", user.username, movie.title);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Movie saved successfully",
        "movie": MovieResponse::from(movie)
    })))
}

#[utoipa::path(
    put,
    path = "/movies",
    tag = "Movies",
    params(("title" = String, Query, description = "Title of the movie to update")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = MovieResponse),
        (status = 400, description = "Missing title or invalid patch"),
        (status = 404, description = "Movie not found")
    ),
    security(("jwt_auth" = []))
)]
pub async fn update_movie(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    query: web::Query<TitleQuery>,
    body: web::Json<UpdateMovieRequest>,
) -> Result<HttpResponse, AppError> {
    let movie =
        movie_service::update_movie(state.movies.as_ref(), query.title.as_deref(), &body).await?;
    log::info!("✏️ Movie updated by {}: {}", user.username, movie.title);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Movie updated successfully.",
        "movie": MovieResponse::from(movie)
    })))
}

#[utoipa::path(
    delete,
    path = "/movies",
    tag = "Movies",
    params(("title" = String, Query, description = "Title of the movie to delete")),
    responses(
        (status = 200, description = "Movie deleted"),
        (status = 400, description = "Missing title"),
        (status = 404, description = "Movie not found")
    ),
    security(("jwt_auth" = []))
)]
pub async fn delete_movie(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    query: web::Query<TitleQuery>,
) -> Result<HttpResponse, AppError> {
    let movie = movie_service::delete_movie(state.movies.as_ref(), query.title.as_deref()).await?;
    log::info!("🗑️ Movie deleted by {}: {}", user.username, movie.title);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Movie deleted successfully."
    })))
}

#[utoipa::path(
    get,
    path = "/movies/{id}",
    tag = "Movies",
    params(
        ("id" = String, Path, description = "Movie ObjectId"),
        ("reviews" = Option<bool>, Query, description = "Join reviews and average rating")
    ),
    responses(
        (status = 200, description = "Movie found", body = RatedMovieResponse),
        (status = 400, description = "Invalid movie ID"),
        (status = 404, description = "Movie not found")
    ),
    security(("jwt_auth" = []))
)]
pub async fn get_movie(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<DetailQuery>,
) -> Result<HttpResponse, AppError> {
    let movie_id = path.into_inner();
    let include_reviews = match query.reviews.as_deref() {
        Some(value) => movie_service::parse_flag("reviews", value)?,
        None => false,
    };

    let movie = movie_service::get_movie(
        state.movies.as_ref(),
        state.reviews.as_ref(),
        &movie_id,
        include_reviews,
    )
    .await?;

    Ok(HttpResponse::Ok().json(movie))
}

#[utoipa::path(
    post,
    path = "/movies/search",
    tag = "Movies",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Movies whose title or actors match, best rated first", body = [RatedMovieResponse]),
        (status = 400, description = "Empty query")
    ),
    security(("jwt_auth" = []))
)]
pub async fn search_movies(
    state: web::Data<AppState>,
    body: web::Json<SearchRequest>,
) -> Result<HttpResponse, AppError> {
    let results = movie_service::search_movies(
        state.movies.as_ref(),
        state.reviews.as_ref(),
        body.query.as_deref(),
    )
    .await?;

    log::info!("🔍 POST /movies/search - {} results", results.len());
    Ok(HttpResponse::Ok().json(results))
}
