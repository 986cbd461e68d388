//! Locations in the four-level administrative hierarchy.
//!
//! Region → District → Ward → Village. Every row is versioned through its
//! [`Validity`]; at most one active row exists per `(kind, code, parent)`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
  Error, Result,
  lifecycle::{AuditActor, Validity},
};

// ─── Type ────────────────────────────────────────────────────────────────────

/// The level of a location in the hierarchy, identified by a one-letter code.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum LocationType {
  #[strum(serialize = "R")]
  #[serde(rename = "R")]
  Region,
  #[strum(serialize = "D")]
  #[serde(rename = "D")]
  District,
  #[strum(serialize = "W")]
  #[serde(rename = "W")]
  Ward,
  #[strum(serialize = "V")]
  #[serde(rename = "V")]
  Village,
}

impl LocationType {
  /// The single-letter storage code.
  pub fn code(self) -> &'static str { self.into() }

  pub fn from_code(code: &str) -> Result<Self> {
    code
      .parse()
      .map_err(|_| Error::UnknownLocationType(code.to_owned()))
  }

  /// The level directly above this one; `None` for regions.
  pub fn parent_kind(self) -> Option<Self> {
    match self {
      Self::Region => None,
      Self::District => Some(Self::Region),
      Self::Ward => Some(Self::District),
      Self::Village => Some(Self::Ward),
    }
  }

  /// Human-readable level name, used in log output.
  pub fn label(self) -> &'static str {
    match self {
      Self::Region => "Region",
      Self::District => "District",
      Self::Ward => "Ward",
      Self::Village => "Village",
    }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A persisted location row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  pub location_id: i64,
  pub kind:        LocationType,
  pub code:        String,
  pub name:        String,
  /// `None` only for regions.
  pub parent_id:   Option<i64>,
  pub validity:    Validity,
  pub audit:       AuditActor,
  /// On a history row, the id of the location it is a past version of.
  /// `None` on active rows.
  pub legacy_id:   Option<i64>,
}

impl Location {
  pub fn is_active(&self) -> bool { self.validity.is_active() }
}

/// Input to [`LocationStore::create_location`] and
/// [`LocationStore::replace_location`].
///
/// The store assigns the id and stamps `validity.from`.
///
/// [`LocationStore::create_location`]: crate::store::LocationStore::create_location
/// [`LocationStore::replace_location`]: crate::store::LocationStore::replace_location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
  pub kind:      LocationType,
  pub code:      String,
  pub name:      String,
  pub parent_id: Option<i64>,
  pub audit:     AuditActor,
}

impl NewLocation {
  /// A location written by the system actor.
  pub fn new(
    kind: LocationType,
    code: impl Into<String>,
    name: impl Into<String>,
    parent_id: Option<i64>,
  ) -> Self {
    Self {
      kind,
      code: code.into(),
      name: name.into(),
      parent_id,
      audit: AuditActor::System,
    }
  }
}
