//! Foundation types for Biblio.
//!
//! This crate provides the record and identifier types shared by every other
//! Biblio crate, plus the key layout used to persist books in a key-value
//! store.
//!
//! # Key Types
//!
//! - [`BookId`] — Positive integer identifier issued by the store counter
//! - [`BookFields`] — The mutable text fields of a book (title, author, genre)
//! - [`Book`] — A persisted book: an id plus its fields
//!
//! # Key Layout
//!
//! - `book:<id>` — hash with the fields `title`, `author`, `genre`
//! - `next_book_id` — integer counter handing out ids

pub mod book;
pub mod error;
pub mod keys;

pub use book::{Book, BookFields, BookId};
pub use error::TypeError;
pub use keys::{book_key, parse_book_key, BOOK_KEY_PREFIX, FIELD_AUTHOR, FIELD_GENRE, FIELD_TITLE, NEXT_ID_KEY};
