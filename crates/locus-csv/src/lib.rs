//! Location CSV reader for Locus.
//!
//! Decodes a header-tagged, comma-delimited UTF-8 file into
//! [`ImportRow`]s. Columns are found by header name: `name` and `code` are
//! always required, `parent_code` for every type except regions. Extra
//! columns are ignored.
//!
//! # Quick start
//!
//! ```no_run
//! use locus_core::location::LocationType;
//!
//! let rows = locus_csv::open("districts.csv", LocationType::District).unwrap();
//! for row in rows {
//!   let row = row.unwrap();
//!   println!("{}: {} ({:?})", row.line, row.code, row.parent_code);
//! }
//! ```

pub mod error;
mod read;

pub use error::{Error, Result};
pub use read::{LocationRows, open, read_rows};
