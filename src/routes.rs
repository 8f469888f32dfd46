use std::time::Duration;

use axum::{
    Router,
    http::{Method, header},
    routing::{delete, get, post, put},
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Book endpoints, mounted under `/api` by [`app`].
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/books", post(handler::create_book))
        .route("/books", get(handler::get_books))
        .route("/books/:id", get(handler::get_book_by_id))
        .route("/books/:id", put(handler::update_book))
        .route("/books/:id", delete(handler::delete_book))
}

/// Any origin with credentials. The request origin and headers are mirrored
/// because a literal `*` is not allowed together with credentials.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(CORS_MAX_AGE)
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::healthcheck))
        .nest("/api", routes())
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
