//! `locus`: batch tools for the location hierarchy and district access.
//!
//! # Usage
//!
//! ```text
//! locus grant-all-districts
//! locus import-locations regions.csv --type R
//! locus import-locations districts.csv --type D --user-districts
//! locus --config /etc/locus.toml import-locations wards.csv -t W
//! ```

mod cli;
mod commands;
mod settings;

use anyhow::Context as _;
use clap::Parser;
use cli::{Cli, Command};
use locus_core::location::LocationType;
use locus_store_sqlite::SqliteStore;
use settings::LocusConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let mut cfg = LocusConfig::load(&cli.config)?;
  if let Some(store_path) = cli.store {
    cfg.store_path = store_path;
  }

  match cli.command {
    Command::GrantAllDistricts => {
      let store = open_store(&cfg).await?;
      commands::grant_all(&store).await
    }
    Command::ImportLocations(args) => {
      // The file is checked before anything else is touched.
      let rows = match locus_csv::open(&args.csv_file, LocationType::from(args.kind)) {
        Ok(rows) => rows,
        Err(err @ locus_csv::Error::NotAFile(_)) => return Err(err.into()),
        Err(err) => {
          return Err(err).with_context(|| {
            format!("failed to read {}", args.csv_file.display())
          });
        }
      };
      let store = open_store(&cfg).await?;
      commands::import_locations(&cfg, &store, &args, rows).await
    }
  }
}

async fn open_store(cfg: &LocusConfig) -> anyhow::Result<SqliteStore> {
  SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))
}
