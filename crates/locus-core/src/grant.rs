//! Grant every active user access to every active district.
//!
//! The job only ever adds the grants that are missing, so running it twice in
//! a row creates nothing the second time.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{lifecycle::AuditActor, location::LocationType, store::LocationStore};

/// Totals for one run of [`grant_all_districts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrantReport {
  /// Active districts found.
  pub districts: usize,
  /// Active users processed.
  pub users:     usize,
  /// Grants written.
  pub created:   usize,
}

/// District ids in `all` that are not in `held`.
pub fn missing_districts(all: &HashSet<i64>, held: &HashSet<i64>) -> Vec<i64> {
  all.difference(held).copied().collect()
}

/// Ensure an active grant exists for every (active user, active district)
/// pair. New grants start at `now` and are written by the system actor.
///
/// Any store error aborts the run.
pub async fn grant_all_districts<S: LocationStore>(
  store: &S,
  now: DateTime<Utc>,
) -> Result<GrantReport, S::Error> {
  info!("*** STARTING TO GRANT ALL ACTIVE USERS ACCESS TO ALL DISTRICTS ***");

  let districts: HashSet<i64> = store
    .active_location_ids(LocationType::District)
    .await?
    .into_iter()
    .collect();
  let users = store.list_active_users().await?;

  info!(count = districts.len(), ids = ?districts, "districts found");
  info!(count = users.len(), "active users found");

  let mut report = GrantReport {
    districts: districts.len(),
    users: users.len(),
    created: 0,
  };

  for user in &users {
    let held: HashSet<i64> = store
      .active_user_district_ids(user.user_id)
      .await?
      .into_iter()
      .collect();
    info!(user_id = user.user_id, districts = ?held, "processing user");

    let missing = missing_districts(&districts, &held);
    if missing.is_empty() {
      continue;
    }

    for district_id in &missing {
      info!(
        user_id = user.user_id,
        district_id, "creating new user district"
      );
    }
    let created = store
      .grant_districts(user.user_id, &missing, AuditActor::System, now)
      .await?;
    report.created += created.len();
  }

  info!("**************************************");
  info!(total = report.created, "total created");

  Ok(report)
}
