//! Book catalog persistence for Biblio.
//!
//! [`BookCatalog`] is the only component that knows how books are laid out
//! in the key-value store. Each operation translates to one or two store
//! commands with no transactions and no retries:
//!
//! - `next_id` -- `INCR next_book_id`
//! - `save` -- `HSET book:<id> title .. author .. genre ..`
//! - `get` -- `HGETALL book:<id>`
//! - `list_all` -- `KEYS book:*`, then `get` per key
//! - `delete` -- `DEL book:<id>`
//! - `search` -- `list_all` filtered in process (linear scan, no index)

pub mod catalog;
pub mod error;

pub use catalog::BookCatalog;
pub use error::{CatalogError, CatalogResult};

pub use biblio_types::{Book, BookFields, BookId};
