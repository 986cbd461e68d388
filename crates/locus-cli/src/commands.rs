//! The two batch commands.

use anyhow::Context as _;
use chrono::Utc;
use locus_core::{
  grant::grant_all_districts,
  import::{ImportOptions, Importer, resolve_admin},
  location::LocationType,
};
use locus_store_sqlite::SqliteStore;
use tracing::info;

use crate::{cli::ImportArgs, settings::LocusConfig};

pub async fn grant_all(store: &SqliteStore) -> anyhow::Result<()> {
  let report = grant_all_districts(store, Utc::now())
    .await
    .context("granting districts failed")?;
  info!(
    districts = report.districts,
    users = report.users,
    created = report.created,
    "grant run finished"
  );
  Ok(())
}

pub async fn import_locations(
  cfg: &LocusConfig,
  store: &SqliteStore,
  args: &ImportArgs,
  rows: locus_csv::LocationRows<std::fs::File>,
) -> anyhow::Result<()> {
  let kind = LocationType::from(args.kind);
  let options = ImportOptions {
    kind,
    grant_admin: args.user_districts,
  };

  println!(
    "**** Starting to import locations from {} ***",
    args.csv_file.display()
  );
  info!(kind = kind.label(), grant_admin = options.grant_admin, "import started");

  let admin = if options.grant_admin {
    resolve_admin(store, &cfg.admin_login)
      .await
      .context("failed to look up the admin account")?
  } else {
    None
  };

  let summary = Importer::new(store, options, admin)
    .run(rows)
    .await
    .with_context(|| format!("import of {} aborted", args.csv_file.display()))?;

  println!("{summary}");
  Ok(())
}
