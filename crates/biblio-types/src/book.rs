use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of a persisted book.
///
/// Ids are issued by the store's atomic counter, start at 1, and are never
/// reused after a delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BookId(u64);

impl BookId {
    /// Create a `BookId`, rejecting zero.
    pub fn new(raw: u64) -> Result<Self, TypeError> {
        if raw == 0 {
            return Err(TypeError::ZeroBookId);
        }
        Ok(Self(raw))
    }

    /// The raw integer value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for BookId {
    type Error = TypeError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<BookId> for u64 {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl FromStr for BookId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .parse()
            .map_err(|_| TypeError::InvalidBookId(s.to_string()))?;
        Self::new(raw)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The mutable text fields of a book.
///
/// No length or charset constraint is enforced on any field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: String,
}

impl BookFields {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
        }
    }

    /// Case-insensitive substring match against title, author, or genre.
    ///
    /// An empty query matches every book.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [&self.title, &self.author, &self.genre]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A persisted book record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(flatten)]
    pub fields: BookFields,
}

impl Book {
    pub fn new(id: BookId, fields: BookFields) -> Self {
        Self { id, fields }
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn author(&self) -> &str {
        &self.fields.author
    }

    pub fn genre(&self) -> &str {
        &self.fields.genre
    }

    /// See [`BookFields::matches`].
    pub fn matches(&self, query: &str) -> bool {
        self.fields.matches(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dune() -> BookFields {
        BookFields::new("Dune", "Herbert", "SciFi")
    }

    #[test]
    fn book_id_rejects_zero() {
        assert_eq!(BookId::new(0), Err(TypeError::ZeroBookId));
        assert_eq!(BookId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn book_id_parse() {
        assert_eq!("42".parse::<BookId>().unwrap().get(), 42);
        assert!(matches!("abc".parse::<BookId>(), Err(TypeError::InvalidBookId(_))));
        assert!(matches!("-3".parse::<BookId>(), Err(TypeError::InvalidBookId(_))));
        assert_eq!("0".parse::<BookId>(), Err(TypeError::ZeroBookId));
    }

    #[test]
    fn book_id_serde_is_a_bare_integer() {
        let id = BookId::new(9).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");
        let back: BookId = serde_json::from_str("9").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<BookId>("0").is_err());
    }

    #[test]
    fn book_serializes_flat() {
        let book = Book::new(BookId::new(1).unwrap(), dune());
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Dune");
        assert_eq!(json["author"], "Herbert");
        assert_eq!(json["genre"], "SciFi");
    }

    #[test]
    fn matches_any_field_ignoring_case() {
        let fields = dune();
        assert!(fields.matches("dune"));
        assert!(fields.matches("herb"));
        assert!(fields.matches("SCIFI"));
        assert!(fields.matches("i"));
        assert!(!fields.matches("xyz"));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(dune().matches(""));
        assert!(BookFields::default().matches(""));
    }

    proptest! {
        #[test]
        fn display_parse_roundtrip(raw in 1u64..) {
            let id = BookId::new(raw).unwrap();
            prop_assert_eq!(id.to_string().parse::<BookId>().unwrap(), id);
        }

        #[test]
        fn any_field_substring_matches(
            title in "[a-zA-Z ]{0,12}",
            author in "[a-zA-Z ]{0,12}",
            genre in "[a-zA-Z ]{0,12}",
            start in 0usize..12,
            len in 0usize..12,
        ) {
            let fields = BookFields::new(title.clone(), author, genre);
            let start = start.min(title.len());
            let end = (start + len).min(title.len());
            let needle = title[start..end].to_uppercase();
            prop_assert!(fields.matches(&needle));
        }

        #[test]
        fn matches_agrees_with_definition(
            title in "[a-cA-C]{0,6}",
            author in "[a-cA-C]{0,6}",
            genre in "[a-cA-C]{0,6}",
            query in "[a-cA-C]{0,3}",
        ) {
            let q = query.to_lowercase();
            let expected = title.to_lowercase().contains(&q)
                || author.to_lowercase().contains(&q)
                || genre.to_lowercase().contains(&q);
            let fields = BookFields::new(title, author, genre);
            prop_assert_eq!(fields.matches(&query), expected);
        }
    }
}
