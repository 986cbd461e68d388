//! Validity intervals and audit actors.
//!
//! Rows are never deleted. A row is *active* while its validity interval is
//! open; archiving a row closes the interval and leaves the row in place as
//! history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Validity ────────────────────────────────────────────────────────────────

/// The time span during which a row is the current version of its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
  pub from: DateTime<Utc>,
  /// `None` while the row is active.
  pub to:   Option<DateTime<Utc>>,
}

impl Validity {
  /// An open interval starting at `from`.
  pub fn open(from: DateTime<Utc>) -> Self { Self { from, to: None } }

  pub fn is_active(&self) -> bool { self.to.is_none() }
}

// ─── Audit actor ─────────────────────────────────────────────────────────────

/// Who wrote a row.
///
/// Batch jobs write as [`AuditActor::System`]. Storage backends that keep an
/// integer `audit_user_id` column encode it with
/// [`AuditActor::SYSTEM_AUDIT_ID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "snake_case")]
pub enum AuditActor {
  /// A batch job or other unattended process.
  System,
  /// A human user, by user id.
  User(i64),
}

impl AuditActor {
  /// Column value reserved for the system actor.
  pub const SYSTEM_AUDIT_ID: i64 = -1;

  pub fn to_audit_id(self) -> i64 {
    match self {
      Self::System => Self::SYSTEM_AUDIT_ID,
      Self::User(id) => id,
    }
  }

  pub fn from_audit_id(id: i64) -> Self {
    if id == Self::SYSTEM_AUDIT_ID {
      Self::System
    } else {
      Self::User(id)
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn system_actor_uses_reserved_id() {
    assert_eq!(AuditActor::System.to_audit_id(), -1);
    assert_eq!(AuditActor::from_audit_id(-1), AuditActor::System);
  }

  #[test]
  fn user_actor_keeps_its_id() {
    assert_eq!(AuditActor::User(42).to_audit_id(), 42);
    assert_eq!(AuditActor::from_audit_id(7), AuditActor::User(7));
  }

  #[test]
  fn open_validity_is_active() {
    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut v = Validity::open(at);
    assert!(v.is_active());
    v.to = Some(at);
    assert!(!v.is_active());
  }
}
