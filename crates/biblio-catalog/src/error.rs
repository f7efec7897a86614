use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("store error: {0}")]
    Store(#[from] biblio_store::StoreError),

    /// A stored field holds bytes that are not valid UTF-8 text.
    #[error("field {field} of {key} is not valid text: {source}")]
    Decode {
        key: String,
        field: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A stored book hash lacks one of its fields.
    #[error("record {key} is missing field {field}")]
    MissingField { key: String, field: &'static str },

    /// The id counter returned a value that cannot be a book id.
    #[error("id counter returned invalid value {0}")]
    InvalidCounter(i64),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
