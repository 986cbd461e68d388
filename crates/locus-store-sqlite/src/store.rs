//! [`SqliteStore`], the SQLite implementation of [`LocationStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use locus_core::{
  lifecycle::{AuditActor, Validity},
  location::{Location, LocationType, NewLocation},
  store::LocationStore,
  user::{User, UserDistrict},
};

use crate::{
  Error, Result,
  encode::{
    LOCATION_COLUMNS, RawLocation, RawUser, RawUserDistrict, USER_COLUMNS,
    USER_DISTRICT_COLUMNS, encode_dt, encode_kind,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Locus store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

/// What the archive-and-replace transaction found.
enum Replaced {
  Missing,
  Archived,
  Done(RawLocation),
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a location query that yields at most one row.
  async fn query_location(
    &self,
    sql: String,
    params: Vec<rusqlite::types::Value>,
  ) -> Result<Option<Location>> {
    let raw: Option<RawLocation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params_from_iter(params),
              RawLocation::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLocation::into_location).transpose()
  }
}

// ─── LocationStore impl ──────────────────────────────────────────────────────

impl LocationStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, login_name: &str) -> Result<User> {
    let validity = Validity::open(Utc::now());
    let login = login_name.to_owned();
    let from_str = encode_dt(validity.from);

    let user_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (login_name, validity_from) VALUES (?1, ?2)",
          rusqlite::params![login, from_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(User {
      user_id,
      login_name: login_name.to_owned(),
      validity,
    })
  }

  async fn list_active_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users
           WHERE validity_to IS NULL
           ORDER BY user_id"
        ))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn find_active_user_by_login(&self, login_name: &str) -> Result<Option<User>> {
    let login = login_name.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE validity_to IS NULL AND login_name = ?1
                 ORDER BY user_id LIMIT 1"
              ),
              rusqlite::params![login],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Location reads ───────────────────────────────────────────────────────

  async fn active_location_ids(&self, kind: LocationType) -> Result<Vec<i64>> {
    let kind_str = encode_kind(kind);

    let ids = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT location_id FROM locations
           WHERE validity_to IS NULL AND type = ?1
           ORDER BY location_id",
        )?;
        let ids = stmt
          .query_map(rusqlite::params![kind_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
      })
      .await?;

    Ok(ids)
  }

  async fn find_active_location_by_code(&self, code: &str) -> Result<Option<Location>> {
    self
      .query_location(
        format!(
          "SELECT {LOCATION_COLUMNS} FROM locations
           WHERE validity_to IS NULL AND code = ?1
           ORDER BY location_id LIMIT 1"
        ),
        vec![code.to_owned().into()],
      )
      .await
  }

  async fn find_active_location(
    &self,
    kind:      LocationType,
    code:      &str,
    parent_id: Option<i64>,
  ) -> Result<Option<Location>> {
    // `IS` compares NULL parents as equal.
    self
      .query_location(
        format!(
          "SELECT {LOCATION_COLUMNS} FROM locations
           WHERE validity_to IS NULL
             AND type = ?1 AND code = ?2 AND parent_id IS ?3"
        ),
        vec![
          encode_kind(kind).to_owned().into(),
          code.to_owned().into(),
          parent_id.into(),
        ],
      )
      .await
  }

  async fn list_locations(&self, include_history: bool) -> Result<Vec<Location>> {
    let raws: Vec<RawLocation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {LOCATION_COLUMNS} FROM locations
           WHERE ?1 OR validity_to IS NULL
           ORDER BY location_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![include_history], RawLocation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLocation::into_location).collect()
  }

  // ── Location writes ──────────────────────────────────────────────────────

  async fn create_location(&self, input: NewLocation) -> Result<Location> {
    let validity = Validity::open(Utc::now());

    let kind_str = encode_kind(input.kind);
    let code     = input.code.clone();
    let name     = input.name.clone();
    let parent   = input.parent_id;
    let from_str = encode_dt(validity.from);
    let audit    = input.audit.to_audit_id();

    let location_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO locations (
             type, code, name, parent_id, validity_from, audit_user_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![kind_str, code, name, parent, from_str, audit],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Location {
      location_id,
      kind: input.kind,
      code: input.code,
      name: input.name,
      parent_id: input.parent_id,
      validity,
      audit: input.audit,
      legacy_id: None,
    })
  }

  async fn replace_location(
    &self,
    old_id:      i64,
    replacement: NewLocation,
  ) -> Result<Location> {
    let now_str  = encode_dt(Utc::now());
    let kind_str = encode_kind(replacement.kind);
    let audit    = replacement.audit.to_audit_id();

    let replaced = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current: Option<Option<String>> = tx
          .query_row(
            "SELECT validity_to FROM locations WHERE location_id = ?1",
            rusqlite::params![old_id],
            |row| row.get(0),
          )
          .optional()?;

        match current {
          None => return Ok(Replaced::Missing),
          Some(Some(_)) => return Ok(Replaced::Archived),
          Some(None) => {}
        }

        // Copy the current version out as a closed history row...
        tx.execute(
          "INSERT INTO locations (
             type, code, name, parent_id, validity_from, validity_to,
             legacy_id, audit_user_id
           )
           SELECT type, code, name, parent_id, validity_from, ?2,
                  location_id, audit_user_id
           FROM locations WHERE location_id = ?1",
          rusqlite::params![old_id, now_str],
        )?;

        // ...then write the replacement onto the active row.
        tx.execute(
          "UPDATE locations
           SET type = ?2, code = ?3, name = ?4, parent_id = ?5,
               validity_from = ?6, audit_user_id = ?7
           WHERE location_id = ?1",
          rusqlite::params![
            old_id,
            kind_str,
            replacement.code,
            replacement.name,
            replacement.parent_id,
            now_str,
            audit,
          ],
        )?;

        let raw = tx.query_row(
          &format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE location_id = ?1"),
          rusqlite::params![old_id],
          RawLocation::from_row,
        )?;

        tx.commit()?;
        Ok(Replaced::Done(raw))
      })
      .await?;

    match replaced {
      Replaced::Missing => Err(Error::LocationNotFound(old_id)),
      Replaced::Archived => Err(Error::AlreadyArchived(old_id)),
      Replaced::Done(raw) => raw.into_location(),
    }
  }

  // ── Access grants ─────────────────────────────────────────────────────────

  async fn active_user_district_ids(&self, user_id: i64) -> Result<Vec<i64>> {
    let ids = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT location_id FROM user_districts
           WHERE validity_to IS NULL AND user_id = ?1
           ORDER BY location_id",
        )?;
        let ids = stmt
          .query_map(rusqlite::params![user_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
      })
      .await?;

    Ok(ids)
  }

  async fn grant_districts(
    &self,
    user_id:      i64,
    location_ids: &[i64],
    actor:        AuditActor,
    at:           DateTime<Utc>,
  ) -> Result<Vec<UserDistrict>> {
    if location_ids.is_empty() {
      return Ok(Vec::new());
    }

    let ids      = location_ids.to_vec();
    let from_str = encode_dt(at);
    let audit    = actor.to_audit_id();

    let inserted: Vec<(i64, i64)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = Vec::with_capacity(ids.len());
        {
          let mut stmt = tx.prepare(
            "INSERT INTO user_districts (
               user_id, location_id, validity_from, audit_user_id
             ) VALUES (?1, ?2, ?3, ?4)",
          )?;
          for location_id in ids {
            let row_id =
              stmt.insert(rusqlite::params![user_id, location_id, from_str, audit])?;
            inserted.push((row_id, location_id));
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(
      inserted
        .into_iter()
        .map(|(user_district_id, location_id)| UserDistrict {
          user_district_id,
          user_id,
          location_id,
          validity: Validity::open(at),
          audit: actor,
        })
        .collect(),
    )
  }

  async fn list_user_districts(&self, user_id: i64) -> Result<Vec<UserDistrict>> {
    let raws: Vec<RawUserDistrict> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_DISTRICT_COLUMNS} FROM user_districts
           WHERE validity_to IS NULL AND user_id = ?1
           ORDER BY user_district_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], RawUserDistrict::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUserDistrict::into_user_district).collect()
  }
}
