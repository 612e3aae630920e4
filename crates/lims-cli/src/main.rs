//! `lims-import`: batch sample order import.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use lims_cli::logging::{LogConfig, LogFormat, init_logging};
use lims_cli::session::ImportSession;
use lims_model::{ImportState, StagingRecord};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_clients, run_edit, run_import, run_list, run_show, run_stage, run_validate,
};
use crate::summary::{print_import, print_record, print_records};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let session = ImportSession::open(cli.reference.as_deref(), &cli.store)?;
    let code = match &cli.command {
        Command::Clients => {
            run_clients(&session);
            0
        }
        Command::List => {
            print_records(&run_list(&session)?);
            0
        }
        Command::Stage(args) => record_exit(&run_stage(&session, args)?),
        Command::Validate(args) => record_exit(&run_validate(&session, args)?),
        Command::Edit(args) => record_exit(&run_edit(&session, args)?),
        Command::Import(args) => {
            print_import(&run_import(&session, args)?);
            0
        }
        Command::Show(args) => {
            print_record(&run_show(&session, args)?);
            0
        }
    };
    Ok(code)
}

/// Print the record; non-zero when it carries errors or failed validation.
fn record_exit(record: &StagingRecord) -> i32 {
    print_record(record);
    if record.has_errors() || record.state == ImportState::Invalid {
        1
    } else {
        0
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
