//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use locus_core::location::LocationType;

#[derive(Parser, Debug)]
#[command(
  name = "locus",
  version,
  about = "Batch tools for the location hierarchy and district access"
)]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "locus.toml")]
  pub config: PathBuf,

  /// SQLite database to use instead of the configured `store_path`.
  #[arg(long, value_name = "FILE")]
  pub store: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Grant every active user access to every active district.
  GrantAllDistricts,

  /// Import locations of one type from a CSV file.
  ImportLocations(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ImportArgs {
  /// Path to the location CSV file (columns: name, code, parent_code).
  pub csv_file: PathBuf,

  /// Location type of every row in the file.
  #[arg(short = 't', long = "type", value_enum)]
  pub kind: TypeArg,

  /// Grant the admin account access to each newly created district.
  #[arg(short = 'u', long = "user-districts", alias = "user_districts")]
  pub user_districts: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeArg {
  /// Region
  #[value(name = "R")]
  Region,
  /// District
  #[value(name = "D")]
  District,
  /// Ward
  #[value(name = "W")]
  Ward,
  /// Village
  #[value(name = "V")]
  Village,
}

impl From<TypeArg> for LocationType {
  fn from(arg: TypeArg) -> Self {
    match arg {
      TypeArg::Region => Self::Region,
      TypeArg::District => Self::District,
      TypeArg::Ward => Self::Ward,
      TypeArg::Village => Self::Village,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("locus").chain(args.iter().copied()))
  }

  #[test]
  fn grant_all_takes_no_arguments() {
    let cli = parse(&["grant-all-districts"]).unwrap();
    assert!(matches!(cli.command, Command::GrantAllDistricts));
    assert_eq!(cli.config, PathBuf::from("locus.toml"));
    assert!(cli.store.is_none());
  }

  #[test]
  fn import_parses_type_and_flag() {
    let cli = parse(&["import-locations", "districts.csv", "-t", "D", "-u"]).unwrap();
    let Command::ImportLocations(args) = cli.command else {
      panic!("expected import-locations");
    };
    assert_eq!(args.csv_file, PathBuf::from("districts.csv"));
    assert_eq!(LocationType::from(args.kind), LocationType::District);
    assert!(args.user_districts);
  }

  #[test]
  fn import_flag_defaults_off() {
    let cli = parse(&["import-locations", "regions.csv", "--type", "R"]).unwrap();
    let Command::ImportLocations(args) = cli.command else {
      panic!("expected import-locations");
    };
    assert_eq!(args.kind, TypeArg::Region);
    assert!(!args.user_districts);
  }

  #[test]
  fn import_accepts_underscore_flag_alias() {
    let cli = parse(&[
      "import-locations",
      "d.csv",
      "--type",
      "D",
      "--user_districts",
    ])
    .unwrap();
    let Command::ImportLocations(args) = cli.command else {
      panic!("expected import-locations");
    };
    assert!(args.user_districts);
  }

  #[test]
  fn import_requires_type() {
    assert!(parse(&["import-locations", "d.csv"]).is_err());
  }

  #[test]
  fn import_rejects_unknown_type() {
    assert!(parse(&["import-locations", "d.csv", "-t", "X"]).is_err());
  }

  #[test]
  fn global_options_precede_subcommand() {
    let cli = parse(&[
      "--config",
      "/etc/locus.toml",
      "--store",
      "/tmp/l.db",
      "grant-all-districts",
    ])
    .unwrap();
    assert_eq!(cli.config, PathBuf::from("/etc/locus.toml"));
    assert_eq!(cli.store, Some(PathBuf::from("/tmp/l.db")));
  }
}
