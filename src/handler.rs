use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use tracing::info;

use crate::api::APIResponse;
use crate::error::ApiError;
use crate::model::{BookChanges, NewBook};
use crate::store::BookStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        AppState { store }
    }
}

type HandlerResult = Result<Response, ApiError>;

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::empty_id());
    }
    raw.parse::<i64>().map_err(|_| ApiError::invalid_id())
}

fn parse_path_id(path: Result<Path<String>, PathRejection>) -> Result<i64, ApiError> {
    match path {
        Ok(Path(raw)) => parse_id(&raw),
        Err(rejection) => {
            tracing::info!("rejected path id: {}", rejection.body_text());
            Err(ApiError::invalid_id())
        }
    }
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::info!("rejected request body: {}", rejection.body_text());
            Err(ApiError::malformed_body())
        }
    }
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(APIResponse::new_from_msg("ok"))
}

pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> HandlerResult {
    let input = parse_body(payload)?;

    let book = state.store.create_book(input).await.map_err(|e| {
        tracing::error!("failed to create book: {:#}", e);
        ApiError::storage("could not create book")
    })?;

    tracing::info!(id = book.id, "book created");
    Ok((StatusCode::OK, Json(APIResponse::new("book has been added", book))).into_response())
}

pub async fn get_books(State(state): State<AppState>) -> HandlerResult {
    let books = state.store.list_books().await.map_err(|e| {
        tracing::error!("failed to get books: {:#}", e);
        ApiError::storage("could not get books")
    })?;

    Ok((StatusCode::OK, Json(APIResponse::new("books fetched successfully", books))).into_response())
}

pub async fn get_book_by_id(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> HandlerResult {
    let id = parse_path_id(path)?;

    match state.store.get_book(id).await {
        Ok(Some(book)) => {
            Ok((StatusCode::OK, Json(APIResponse::new("book retrieved successfully", book))).into_response())
        }
        Ok(None) => {
            tracing::info!(id, "book not found");
            Err(ApiError::storage("could not get the book"))
        }
        Err(e) => {
            tracing::error!("failed to get book {}: {:#}", id, e);
            Err(ApiError::storage("could not get the book"))
        }
    }
}

pub async fn update_book(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<BookChanges>, JsonRejection>,
) -> HandlerResult {
    let id = parse_path_id(path)?;
    let changes = parse_body(payload)?;

    match state.store.update_book(id, changes).await {
        Ok(Some(book)) => {
            tracing::info!(id, "book updated");
            Ok((StatusCode::OK, Json(APIResponse::new("book has been updated", book))).into_response())
        }
        Ok(None) => {
            tracing::info!(id, "book not found for update");
            Err(ApiError::storage("could not update book"))
        }
        Err(e) => {
            tracing::error!("failed to update book {}: {:#}", id, e);
            Err(ApiError::storage("could not update book"))
        }
    }
}

pub async fn delete_book(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> HandlerResult {
    let id = parse_path_id(path)?;

    match state.store.delete_book(id).await {
        Ok(true) => {
            tracing::info!(id, "book deleted");
            Ok((StatusCode::OK, Json(APIResponse::new_from_msg("book delete successfully"))).into_response())
        }
        Ok(false) => {
            tracing::info!(id, "book not found for delete");
            Err(ApiError::storage("could not delete book"))
        }
        Err(e) => {
            tracing::error!("failed to delete book {}: {:#}", id, e);
            Err(ApiError::storage("could not delete book"))
        }
    }
}
