use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the store and transfer layers.
///
/// Absent records never produce an error: a missing tag reads as `""`
/// and a date without claims as an empty list. Likewise a claim whose
/// category no longer exists resolves to a neutral fallback color
/// instead of failing the read path.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying storage failure (I/O, quota, corruption). The operation
    /// is rejected as a whole; there is no retry or partial recovery.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The connection pool could not hand out a connection.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Filesystem failure while creating the store location.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// An import document that is not even valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An import document that parsed as JSON but does not look like an
    /// export (wrong top-level shape). Reported before anything is wiped.
    #[error("invalid export document: {0}")]
    InvalidDocument(&'static str),
}
