//! Command-line arguments for `lims-import`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use lims_cli::session::DEFAULT_STORE_DIR;

#[derive(Parser)]
#[command(
    name = "lims-import",
    version,
    about = "Stage, validate and import batch sample order files",
    long_about = "Stage, validate and import batch sample order files.\n\n\
                  An order file carries a header section, an optional batch section\n\
                  and a samples table. Each file becomes a staged import that is\n\
                  validated against the reference data before samples are created."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Reference data file (TOML or JSON). Defaults to $LIMS_REFERENCE_DATA,
    /// then ./lims-reference.toml.
    #[arg(long = "reference", value_name = "PATH", global = true)]
    pub reference: Option<PathBuf>,

    /// Directory holding staged imports.
    #[arg(long = "store", value_name = "DIR", default_value = DEFAULT_STORE_DIR, global = true)]
    pub store: PathBuf,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include order file values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List clients in the reference data.
    Clients,

    /// List staged imports.
    List,

    /// Attach an order file to an import and stage it.
    Stage(StageArgs),

    /// Validate a staged import against the reference data.
    Validate(RecordArgs),

    /// Return a valid or invalid import to draft.
    Edit(RecordArgs),

    /// Create the samples of a valid import.
    Import(ImportArgs),

    /// Show a staged import with its samples and errors.
    Show(RecordArgs),
}

#[derive(Parser)]
pub struct StageArgs {
    /// Order file (CSV).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Client UID, client ID or name.
    #[arg(long = "client", value_name = "CLIENT")]
    pub client: String,

    /// Restage this import instead of creating a new one.
    #[arg(long = "id", value_name = "ID")]
    pub id: Option<String>,
}

#[derive(Parser)]
pub struct RecordArgs {
    /// Import id, e.g. import-0001.
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Parser)]
pub struct ImportArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// Write the created samples and batches as JSON.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_arguments() {
        let cli = Cli::try_parse_from([
            "lims-import",
            "--store",
            "/tmp/imports",
            "stage",
            "order.csv",
            "--client",
            "HH",
        ])
        .unwrap();
        assert_eq!(cli.store, PathBuf::from("/tmp/imports"));
        match cli.command {
            Command::Stage(args) => {
                assert_eq!(args.file, PathBuf::from("order.csv"));
                assert_eq!(args.client, "HH");
                assert!(args.id.is_none());
            }
            _ => panic!("expected stage"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lims-import",
            "import",
            "import-0002",
            "--output",
            "out.json",
            "--log-data",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert!(cli.log_data);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert_eq!(cli.store, PathBuf::from(DEFAULT_STORE_DIR));
        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.id, "import-0002");
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_stage_requires_client() {
        assert!(Cli::try_parse_from(["lims-import", "stage", "order.csv"]).is_err());
    }
}
