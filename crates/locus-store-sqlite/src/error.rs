//! Error type for `locus-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] locus_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to replace a location that does not exist.
  #[error("location not found: {0}")]
  LocationNotFound(i64),

  #[error("location {0} is already archived")]
  AlreadyArchived(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
