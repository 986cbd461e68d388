//! The `LocationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `locus-store-sqlite`).
//! The batch engines in [`crate::grant`] and [`crate::import`] depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  lifecycle::AuditActor,
  location::{Location, LocationType, NewLocation},
  user::{User, UserDistrict},
};

/// Abstraction over the relational store holding users, locations and
/// access grants.
///
/// Rows are never deleted. Location changes are expressed by archiving the
/// active row and writing a replacement; grants are append-only.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait LocationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create an active user. User accounts belong to the authentication
  /// system; this exists for seeding and tests.
  fn add_user<'a>(
    &'a self,
    login_name: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  /// All users with an open validity interval.
  fn list_active_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// The first active user with the given login name, if any.
  fn find_active_user_by_login<'a>(
    &'a self,
    login_name: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Location reads ───────────────────────────────────────────────────

  /// Ids of every active location of `kind`.
  fn active_location_ids(
    &self,
    kind: LocationType,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + '_;

  /// The first active location with `code`, whatever its type.
  fn find_active_location_by_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Location>, Self::Error>> + Send + 'a;

  /// The active location holding the natural key `(kind, code, parent_id)`.
  fn find_active_location<'a>(
    &'a self,
    kind: LocationType,
    code: &'a str,
    parent_id: Option<i64>,
  ) -> impl Future<Output = Result<Option<Location>, Self::Error>> + Send + 'a;

  /// Every location row. Archived rows are included only when
  /// `include_history` is set.
  fn list_locations(
    &self,
    include_history: bool,
  ) -> impl Future<Output = Result<Vec<Location>, Self::Error>> + Send + '_;

  // ── Location writes ──────────────────────────────────────────────────

  /// Insert a new active location. `validity.from` is set by the store.
  fn create_location(
    &self,
    input: NewLocation,
  ) -> impl Future<Output = Result<Location, Self::Error>> + Send + '_;

  /// Archive the current version of `old_id` as a history row and write
  /// `replacement` onto it, atomically. The location keeps its id, so parent
  /// references and grants stay attached to the active version.
  ///
  /// Returns an error if `old_id` does not exist or is already archived.
  fn replace_location(
    &self,
    old_id: i64,
    replacement: NewLocation,
  ) -> impl Future<Output = Result<Location, Self::Error>> + Send + '_;

  // ── Access grants ─────────────────────────────────────────────────────

  /// Location ids for which `user_id` holds an active grant.
  fn active_user_district_ids(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + '_;

  /// Grant `user_id` access to each of `location_ids`, with validity starting
  /// at `at`. All rows are written in one transaction.
  fn grant_districts<'a>(
    &'a self,
    user_id: i64,
    location_ids: &'a [i64],
    actor: AuditActor,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<UserDistrict>, Self::Error>> + Send + 'a;

  /// Active grants held by `user_id`.
  fn list_user_districts(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<UserDistrict>, Self::Error>> + Send + '_;
}
