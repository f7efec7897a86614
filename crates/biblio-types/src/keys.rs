//! Key layout for books in the shared keyspace.
//!
//! Existing deployments already hold data under these keys, so the layout
//! must not change.

use crate::book::BookId;
use crate::error::TypeError;

/// Prefix distinguishing book records from other keys.
pub const BOOK_KEY_PREFIX: &str = "book:";

/// Counter key handing out the next book id.
pub const NEXT_ID_KEY: &str = "next_book_id";

pub const FIELD_TITLE: &str = "title";
pub const FIELD_AUTHOR: &str = "author";
pub const FIELD_GENRE: &str = "genre";

/// Key of the hash holding the book with the given id.
pub fn book_key(id: BookId) -> String {
    format!("{BOOK_KEY_PREFIX}{id}")
}

/// Parse the numeric id suffix out of a `book:<id>` key.
pub fn parse_book_key(key: &str) -> Result<BookId, TypeError> {
    let suffix = key
        .strip_prefix(BOOK_KEY_PREFIX)
        .ok_or_else(|| TypeError::NotABookKey(key.to_string()))?;
    suffix.parse()
}
