//! Error types for `locus-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown location type code: {0:?}")]
  UnknownLocationType(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
