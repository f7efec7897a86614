use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all Biblio endpoints.
///
/// Deleting goes through the confirmation page: `GET /delete/:id` only
/// renders it, `POST /delete/confirm/:id` removes the book.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::index))
        .route("/add", get(handler::add_form).post(handler::add_book))
        .route("/edit/:id", get(handler::edit_form).post(handler::edit_book))
        .route("/delete/:id", get(handler::delete_confirmation))
        .route("/delete/confirm/:id", post(handler::delete_book))
        .route("/search", get(handler::search_form).post(handler::search))
        .route("/health", get(handler::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
