use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use biblio_types::BookId;
use thiserror::Error;
use tracing::{debug, error};

use crate::views;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("book not found: {0}")]
    BookNotFound(BookId),

    #[error("catalog error: {0}")]
    Catalog(#[from] biblio_catalog::CatalogError),

    #[error("store error: {0}")]
    Store(#[from] biblio_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// A missing book renders the error view; anything else is a 500.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::BookNotFound(id) => {
                debug!(%id, "book not found");
                (StatusCode::NOT_FOUND, Html(views::error("Book not found."))).into_response()
            }
            other => {
                error!("request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::error("The catalog could not be read. Please try again later.")),
                )
                    .into_response()
            }
        }
    }
}
