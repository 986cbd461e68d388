//! Error types for the location CSV reader.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{} is not a correct file path", .0.display())]
  NotAFile(PathBuf),

  #[error("missing required column {0:?}")]
  MissingColumn(&'static str),

  #[error("line {line}: missing value for column {column:?}")]
  MissingField { line: usize, column: &'static str },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
