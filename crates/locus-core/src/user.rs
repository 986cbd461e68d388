//! Users and their district access grants.

use serde::{Deserialize, Serialize};

use crate::lifecycle::{AuditActor, Validity};

/// An interactive user account. Only users with an open validity interval are
/// considered by the batch jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    i64,
  pub login_name: String,
  pub validity:   Validity,
}

impl User {
  pub fn is_active(&self) -> bool { self.validity.is_active() }
}

/// "User X may act on district Y." Grants are only ever added by the batch
/// jobs; they are never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDistrict {
  pub user_district_id: i64,
  pub user_id:          i64,
  /// Always a [`LocationType::District`](crate::location::LocationType) row.
  pub location_id:      i64,
  pub validity:         Validity,
  pub audit:            AuditActor,
}
