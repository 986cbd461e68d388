//! Integration tests for `SqliteStore` and the batch engines against an
//! in-memory database.

mod store;

use locus_core::{
  location::{Location, LocationType, NewLocation},
  store::LocationStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn location(
  s: &SqliteStore,
  kind: LocationType,
  code: &str,
  name: &str,
  parent: Option<&Location>,
) -> Location {
  s.create_location(NewLocation::new(
    kind,
    code,
    name,
    parent.map(|p| p.location_id),
  ))
  .await
  .unwrap()
}

/// Close a user's validity, as the authentication system would on deletion.
async fn deactivate_user(s: &SqliteStore, user_id: i64) {
  s.conn
    .call(move |conn| {
      conn.execute(
        "UPDATE users SET validity_to = validity_from WHERE user_id = ?1",
        rusqlite::params![user_id],
      )?;
      Ok(())
    })
    .await
    .unwrap();
}
