use std::sync::Arc;

use biblio_store::KvStore;
use biblio_types::{
    book_key, parse_book_key, Book, BookFields, BookId, BOOK_KEY_PREFIX, FIELD_AUTHOR,
    FIELD_GENRE, FIELD_TITLE, NEXT_ID_KEY,
};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};

/// Persistence accessor for books.
///
/// The catalog owns no state besides its store handle. It is cheap to clone
/// and meant to be constructed once and injected wherever books are read or
/// written.
#[derive(Clone)]
pub struct BookCatalog {
    store: Arc<dyn KvStore>,
}

impl BookCatalog {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// Allocate the next book id.
    ///
    /// Atomic against concurrent callers; the first id on an empty store is 1.
    pub async fn next_id(&self) -> CatalogResult<BookId> {
        let raw = self.store.incr(NEXT_ID_KEY).await?;
        let id = u64::try_from(raw)
            .ok()
            .and_then(|raw| BookId::new(raw).ok())
            .ok_or(CatalogError::InvalidCounter(raw))?;
        Ok(id)
    }

    /// Write all three fields of the book at `id`.
    ///
    /// No existence check: this creates the record or overwrites it.
    pub async fn save(&self, id: BookId, fields: &BookFields) -> CatalogResult<()> {
        let key = book_key(id);
        self.store
            .hset_multiple(
                &key,
                &[
                    (FIELD_TITLE, fields.title.as_str()),
                    (FIELD_AUTHOR, fields.author.as_str()),
                    (FIELD_GENRE, fields.genre.as_str()),
                ],
            )
            .await?;
        debug!(%id, "saved book");
        Ok(())
    }

    /// Allocate an id and save a new book under it.
    pub async fn create(&self, fields: BookFields) -> CatalogResult<Book> {
        let id = self.next_id().await?;
        self.save(id, &fields).await?;
        info!(%id, title = %fields.title, "created book");
        Ok(Book::new(id, fields))
    }

    /// Read the book at `id`.
    ///
    /// Returns `Ok(None)` if the key does not exist or holds no fields.
    pub async fn get(&self, id: BookId) -> CatalogResult<Option<Book>> {
        let key = book_key(id);
        let mut raw = self.store.hgetall(&key).await?;
        if raw.is_empty() {
            return Ok(None);
        }

        let mut take = |field: &'static str| -> CatalogResult<String> {
            let pos = raw
                .iter()
                .position(|(name, _)| name == field)
                .ok_or_else(|| CatalogError::MissingField {
                    key: key.clone(),
                    field,
                })?;
            let (_, bytes) = raw.swap_remove(pos);
            String::from_utf8(bytes).map_err(|source| CatalogError::Decode {
                key: key.clone(),
                field,
                source,
            })
        };

        let fields = BookFields {
            title: take(FIELD_TITLE)?,
            author: take(FIELD_AUTHOR)?,
            genre: take(FIELD_GENRE)?,
        };
        Ok(Some(Book::new(id, fields)))
    }

    /// Read every book in the store, ordered by id.
    ///
    /// Keys under the book prefix whose suffix is not an id in canonical
    /// decimal form are skipped, as are books deleted between the key scan
    /// and the read.
    pub async fn list_all(&self) -> CatalogResult<Vec<Book>> {
        let keys = self.store.scan_prefix(BOOK_KEY_PREFIX).await?;
        let mut ids = Vec::with_capacity(keys.len());
        for key in &keys {
            match parse_book_key(key) {
                // `book:01` parses to 1 but is not the key `get` reads.
                Ok(id) if book_key(id) == *key => ids.push(id),
                Ok(id) => warn!(key = %key, %id, "skipping non-canonical book key"),
                Err(e) => warn!(key = %key, "skipping key: {}", e),
            }
        }
        ids.sort();
        ids.dedup();

        let mut books = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(book) = self.get(id).await? {
                books.push(book);
            }
        }
        Ok(books)
    }

    /// Remove the book at `id`. Returns `true` if it existed.
    pub async fn delete(&self, id: BookId) -> CatalogResult<bool> {
        let existed = self.store.del(&book_key(id)).await?;
        info!(%id, existed, "deleted book");
        Ok(existed)
    }

    /// Books whose title, author, or genre contains `query`, ignoring case.
    ///
    /// Linear scan over [`list_all`](Self::list_all). An empty query returns
    /// every book.
    pub async fn search(&self, query: &str) -> CatalogResult<Vec<Book>> {
        let books = self.list_all().await?;
        let total = books.len();
        let results: Vec<Book> = books.into_iter().filter(|b| b.matches(query)).collect();
        debug!(query, total, hits = results.len(), "search");
        Ok(results)
    }
}

impl std::fmt::Debug for BookCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookCatalog").finish_non_exhaustive()
    }
}
