//! Core types, the storage trait, and the batch engines for the Locus
//! location-hierarchy tools.
//!
//! This crate is deliberately free of database and file-format dependencies.
//! Backends implement [`store::LocationStore`]; the engines in [`grant`] and
//! [`import`] are generic over it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod grant;
pub mod import;
pub mod lifecycle;
pub mod location;
pub mod store;
pub mod user;

pub use error::{Error, Result};
