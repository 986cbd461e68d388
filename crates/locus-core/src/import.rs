//! Bulk import of locations of a single type.
//!
//! Each row is resolved against its parent by code, then matched against the
//! active location holding the natural key `(kind, code, parent)`:
//!
//! - no active match: the location is created, and a new district may be
//!   granted to the admin account;
//! - an active match with a different name: the match is archived and replaced
//!   in one step;
//! - an active match with the same name: nothing is written.
//!
//! A row whose parent cannot be resolved is counted as an error and skipped.
//! Anything else that goes wrong aborts the run.

use std::fmt;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
  lifecycle::AuditActor,
  location::{Location, LocationType, NewLocation},
  store::LocationStore,
  user::{User, UserDistrict},
};

// ─── Input ───────────────────────────────────────────────────────────────────

/// One decoded input row. Values are already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
  /// 1-based data row number, used in progress output.
  pub line:        usize,
  pub name:        String,
  pub code:        String,
  /// Ignored for regions.
  pub parent_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
  /// The type of every location in the file.
  pub kind:        LocationType,
  /// Grant the admin account access to each newly created district.
  pub grant_admin: bool,
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// What happened to the admin grant for a created row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
  /// Grants were not requested, or the row is not a district.
  NotRequested,
  Granted(UserDistrict),
  /// Grants were requested but no admin account could be resolved. The
  /// location itself was still written.
  AdminMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
  /// No active location carries the row's parent code. Nothing was written.
  ParentNotFound { parent_code: Option<String> },
  Created {
    location: Location,
    grant:    GrantOutcome,
  },
  /// The previous active version was archived and replaced.
  Updated {
    previous: Location,
    location: Location,
  },
  /// The active version already matches the row.
  Unchanged { location: Location },
}

/// Running totals for an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
  pub kind:           LocationType,
  pub rows:           usize,
  pub created:        usize,
  pub updated:        usize,
  pub unchanged:      usize,
  pub grants_created: usize,
  pub errors:         usize,
}

impl ImportSummary {
  pub fn new(kind: LocationType) -> Self {
    Self {
      kind,
      rows: 0,
      created: 0,
      updated: 0,
      unchanged: 0,
      grants_created: 0,
      errors: 0,
    }
  }
}

impl fmt::Display for ImportSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "-------------------------")?;
    writeln!(f, "Total received: {}", self.rows)?;
    if self.kind == LocationType::District {
      writeln!(
        f,
        "Total created: {} + {} UserDistrict(s) to the admin",
        self.created, self.grants_created
      )?;
    } else {
      writeln!(f, "Total created: {}", self.created)?;
    }
    writeln!(f, "Total updated: {}", self.updated)?;
    writeln!(f, "Total unchanged: {}", self.unchanged)?;
    writeln!(f, "Total errors: {}", self.errors)
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A fatal import failure: either the store or the row source failed.
#[derive(Debug, Error)]
pub enum ImportError<S, R> {
  #[error("store error: {0}")]
  Store(#[source] S),

  #[error("malformed row: {0}")]
  Row(#[source] R),
}

// ─── Importer ────────────────────────────────────────────────────────────────

/// Look up the admin account by login name.
///
/// Call once, before the first row. An absent admin is not an error here; it
/// is reported each time a grant would have been made.
pub async fn resolve_admin<S: LocationStore>(
  store: &S,
  login_name: &str,
) -> Result<Option<User>, S::Error> {
  let admin = store.find_active_user_by_login(login_name).await?;
  if admin.is_none() {
    warn!(login_name, "admin account not found; district grants will be skipped");
  }
  Ok(admin)
}

/// Imports rows one at a time and keeps the running [`ImportSummary`].
pub struct Importer<'a, S> {
  store:   &'a S,
  options: ImportOptions,
  admin:   Option<User>,
  summary: ImportSummary,
}

impl<'a, S: LocationStore> Importer<'a, S> {
  /// `admin` is only consulted when `options.grant_admin` is set.
  pub fn new(store: &'a S, options: ImportOptions, admin: Option<User>) -> Self {
    Self {
      store,
      options,
      admin,
      summary: ImportSummary::new(options.kind),
    }
  }

  pub fn summary(&self) -> &ImportSummary { &self.summary }

  /// Import every row, stopping at the first fatal error.
  pub async fn run<I, R>(
    mut self,
    rows: I,
  ) -> Result<ImportSummary, ImportError<S::Error, R>>
  where
    I: IntoIterator<Item = Result<ImportRow, R>>,
  {
    for row in rows {
      let row = row.map_err(ImportError::Row)?;
      self.import_row(row).await.map_err(ImportError::Store)?;
    }
    Ok(self.summary)
  }

  /// Import a single row and update the running totals.
  pub async fn import_row(&mut self, row: ImportRow) -> Result<RowOutcome, S::Error> {
    self.summary.rows += 1;
    let kind = self.options.kind;
    let line = row.line;

    let parent = if kind == LocationType::Region {
      None
    } else {
      let parent = match row.parent_code.as_deref() {
        Some(code) => self.store.find_active_location_by_code(code).await?,
        None => None,
      };
      match parent {
        Some(parent) => Some(parent),
        None => {
          self.summary.errors += 1;
          error!(
            line,
            "Error: parent unknown - no code ({})",
            row.parent_code.as_deref().unwrap_or_default()
          );
          return Ok(RowOutcome::ParentNotFound {
            parent_code: row.parent_code,
          });
        }
      }
    };

    if let Some(parent) = &parent
      && kind.parent_kind() != Some(parent.kind)
    {
      warn!(
        line,
        parent_code = %parent.code,
        parent_kind = parent.kind.label(),
        kind = kind.label(),
        "parent is not at the level directly above"
      );
    }

    let parent_id = parent.map(|p| p.location_id);
    let existing = self
      .store
      .find_active_location(kind, &row.code, parent_id)
      .await?;

    match existing {
      None => {
        let location = self
          .store
          .create_location(NewLocation::new(kind, row.code, row.name, parent_id))
          .await?;
        self.summary.created += 1;
        info!(line, location_id = location.location_id, "Location created");

        let grant = self.grant_to_admin(&location).await?;
        Ok(RowOutcome::Created { location, grant })
      }
      Some(previous) if previous.name != row.name => {
        let location = self
          .store
          .replace_location(
            previous.location_id,
            NewLocation::new(kind, row.code, row.name, parent_id),
          )
          .await?;
        self.summary.updated += 1;
        info!(
          line,
          previous_id = previous.location_id,
          location_id = location.location_id,
          "Location updated"
        );
        Ok(RowOutcome::Updated { previous, location })
      }
      Some(location) => {
        self.summary.unchanged += 1;
        info!(line, location_id = location.location_id, "Location already exists");
        Ok(RowOutcome::Unchanged { location })
      }
    }
  }

  async fn grant_to_admin(&mut self, location: &Location) -> Result<GrantOutcome, S::Error> {
    if !self.options.grant_admin || location.kind != LocationType::District {
      return Ok(GrantOutcome::NotRequested);
    }

    let Some(admin) = &self.admin else {
      error!(
        location_id = location.location_id,
        "Error during the UserDistrict creation - admin couldn't be found"
      );
      return Ok(GrantOutcome::AdminMissing);
    };

    let granted = self
      .store
      .grant_districts(
        admin.user_id,
        &[location.location_id],
        AuditActor::System,
        Utc::now(),
      )
      .await?;

    match granted.into_iter().next() {
      Some(grant) => {
        self.summary.grants_created += 1;
        Ok(GrantOutcome::Granted(grant))
      }
      None => Ok(GrantOutcome::NotRequested),
    }
  }
}
