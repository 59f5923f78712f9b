use graftwatch_model::ParseError;

/// Failures inside the analytical adapter. All of them surface as a generic
/// internal error on the wire; the variants exist for logs and tests.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("store open failed: {0}")]
    Open(String),
    #[error("statement preparation failed: {0}")]
    Prepare(String),
    #[error("query execution failed: {0}")]
    Query(String),
    #[error("row decode failed: {0}")]
    Decode(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::InvalidColumnType(..) | rusqlite::Error::InvalidColumnIndex(_) => {
                StoreError::Decode(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl From<ParseError> for StoreError {
    fn from(err: ParseError) -> Self {
        StoreError::Decode(err.to_string())
    }
}
