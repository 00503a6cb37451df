use thiserror::Error;

/// Classified outcomes of store operations. The boundary layer maps these to
/// transport responses; the store itself never logs or prints.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The caller does not own the resource, or it does not exist. The two
    /// cases are collapsed on purpose so probing ids owned by someone else
    /// looks exactly like asking for a nonexistent id.
    #[error("caller may not access this resource")]
    Forbidden,

    /// The final statement matched zero rows (read, search, delete).
    #[error("no matching resource")]
    NotFound,

    /// An update passed the eligibility gate but affected zero rows: the row
    /// was deleted concurrently between check and act. Retryable.
    #[error("update affected no rows")]
    NoAffectedRow,

    /// A partial update arrived with no fields to change.
    #[error("at least one field must be supplied")]
    EmptyUpdate,

    /// Pool, connection, transaction, or any unclassified driver failure.
    #[error(transparent)]
    Infrastructure(#[from] sqlx::Error),
}
