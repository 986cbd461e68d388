//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, location types as their
//! one-letter code, and audit actors as an integer user id.

use chrono::{DateTime, Utc};
use locus_core::{
  lifecycle::{AuditActor, Validity},
  location::{Location, LocationType},
  user::{User, UserDistrict},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_validity(from: &str, to: Option<&str>) -> Result<Validity> {
  Ok(Validity {
    from: decode_dt(from)?,
    to:   to.map(decode_dt).transpose()?,
  })
}

// ─── LocationType ────────────────────────────────────────────────────────────

pub fn encode_kind(kind: LocationType) -> &'static str { kind.code() }

pub fn decode_kind(s: &str) -> Result<LocationType> {
  Ok(LocationType::from_code(s)?)
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Column list matching [`RawLocation::from_row`].
pub const LOCATION_COLUMNS: &str = "location_id, type, code, name, parent_id, \
                                    validity_from, validity_to, audit_user_id, \
                                    legacy_id";

/// A location row as read from SQLite before decoding.
#[derive(Debug)]
pub struct RawLocation {
  pub location_id:   i64,
  pub kind:          String,
  pub code:          String,
  pub name:          String,
  pub parent_id:     Option<i64>,
  pub validity_from: String,
  pub validity_to:   Option<String>,
  pub audit_user_id: i64,
  pub legacy_id:     Option<i64>,
}

impl RawLocation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      location_id:   row.get(0)?,
      kind:          row.get(1)?,
      code:          row.get(2)?,
      name:          row.get(3)?,
      parent_id:     row.get(4)?,
      validity_from: row.get(5)?,
      validity_to:   row.get(6)?,
      audit_user_id: row.get(7)?,
      legacy_id:     row.get(8)?,
    })
  }

  pub fn into_location(self) -> Result<Location> {
    Ok(Location {
      location_id: self.location_id,
      kind:        decode_kind(&self.kind)?,
      code:        self.code,
      name:        self.name,
      parent_id:   self.parent_id,
      validity:    decode_validity(&self.validity_from, self.validity_to.as_deref())?,
      audit:       AuditActor::from_audit_id(self.audit_user_id),
      legacy_id:   self.legacy_id,
    })
  }
}

pub const USER_COLUMNS: &str = "user_id, login_name, validity_from, validity_to";

#[derive(Debug)]
pub struct RawUser {
  pub user_id:       i64,
  pub login_name:    String,
  pub validity_from: String,
  pub validity_to:   Option<String>,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      login_name:    row.get(1)?,
      validity_from: row.get(2)?,
      validity_to:   row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    self.user_id,
      login_name: self.login_name,
      validity:   decode_validity(&self.validity_from, self.validity_to.as_deref())?,
    })
  }
}

pub const USER_DISTRICT_COLUMNS: &str = "user_district_id, user_id, location_id, \
                                         validity_from, validity_to, audit_user_id";

#[derive(Debug)]
pub struct RawUserDistrict {
  pub user_district_id: i64,
  pub user_id:          i64,
  pub location_id:      i64,
  pub validity_from:    String,
  pub validity_to:      Option<String>,
  pub audit_user_id:    i64,
}

impl RawUserDistrict {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_district_id: row.get(0)?,
      user_id:          row.get(1)?,
      location_id:      row.get(2)?,
      validity_from:    row.get(3)?,
      validity_to:      row.get(4)?,
      audit_user_id:    row.get(5)?,
    })
  }

  pub fn into_user_district(self) -> Result<UserDistrict> {
    Ok(UserDistrict {
      user_district_id: self.user_district_id,
      user_id:          self.user_id,
      location_id:      self.location_id,
      validity:         decode_validity(&self.validity_from, self.validity_to.as_deref())?,
      audit:            AuditActor::from_audit_id(self.audit_user_id),
    })
  }
}
