//! HTTP server for Biblio.
//!
//! Serves the book catalog as server-rendered HTML pages: list, add, edit,
//! delete with confirmation, and substring search.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod views;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, HealthResponse};
pub use server::BiblioServer;
