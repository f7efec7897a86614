use axum::extract::{Path, State};
use axum::response::{Html, Json, Redirect};
use axum::Form;
use biblio_catalog::BookCatalog;
use biblio_store::KvStore;
use biblio_types::{BookFields, BookId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::views;

/// Shared handler state. Cloned per request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub catalog: BookCatalog,
}

impl AppState {
    pub fn new(catalog: BookCatalog) -> Self {
        Self { catalog }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchForm {
    pub query: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> ServerResult<Html<String>> {
    let books = state.catalog.list_all().await?;
    Ok(Html(views::list(&books)))
}

/// `GET /add`
pub async fn add_form() -> Html<String> {
    Html(views::add_form())
}

/// `POST /add`
pub async fn add_book(
    State(state): State<AppState>,
    Form(fields): Form<BookFields>,
) -> ServerResult<Redirect> {
    state.catalog.create(fields).await?;
    Ok(Redirect::to("/"))
}

/// `GET /edit/:id`
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
) -> ServerResult<Html<String>> {
    let book = state
        .catalog
        .get(id)
        .await?
        .ok_or(ServerError::BookNotFound(id))?;
    Ok(Html(views::edit_form(&book)))
}

/// `POST /edit/:id`
///
/// The existence check and the overwrite are separate store calls, so a
/// concurrent delete in between recreates the record.
pub async fn edit_book(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
    Form(fields): Form<BookFields>,
) -> ServerResult<Redirect> {
    if state.catalog.get(id).await?.is_none() {
        return Err(ServerError::BookNotFound(id));
    }
    state.catalog.save(id, &fields).await?;
    info!(%id, "updated book");
    Ok(Redirect::to("/"))
}

/// `GET /delete/:id`
pub async fn delete_confirmation(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
) -> ServerResult<Html<String>> {
    let book = state
        .catalog
        .get(id)
        .await?
        .ok_or(ServerError::BookNotFound(id))?;
    Ok(Html(views::delete_confirmation(&book)))
}

/// `POST /delete/confirm/:id`
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
) -> ServerResult<Redirect> {
    state.catalog.delete(id).await?;
    Ok(Redirect::to("/"))
}

/// `GET /search`
pub async fn search_form() -> Html<String> {
    Html(views::search_form())
}

/// `POST /search`
pub async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> ServerResult<Html<String>> {
    let results = state.catalog.search(&form.query).await?;
    Ok(Html(views::search_results(&results, &form.query)))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> ServerResult<Json<HealthResponse>> {
    state.catalog.store().ping().await?;
    Ok(Json(HealthResponse::default()))
}
