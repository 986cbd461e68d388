//! Runtime configuration.
//!
//! Read from an optional TOML file, then overridden by `LOCUS_*` environment
//! variables (e.g. `LOCUS_STORE_PATH`, `LOCUS_ADMIN_LOGIN`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LocusConfig {
  /// SQLite database file. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:  PathBuf,
  /// Login name of the account granted access to newly imported districts.
  #[serde(default = "default_admin_login")]
  pub admin_login: String,
}

fn default_store_path() -> PathBuf { PathBuf::from("locus.db") }

fn default_admin_login() -> String { "Admin".to_owned() }

impl LocusConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("LOCUS"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: LocusConfig = settings
      .try_deserialize()
      .context("failed to deserialise LocusConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
