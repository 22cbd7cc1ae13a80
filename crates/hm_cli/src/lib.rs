mod cmd;
pub mod error;
mod map;
mod table;

use std::{
    fmt,
    io::{self, IsTerminal as _, Write as _},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{ArgAction, Parser};
use cmd::{Commands, Success};
use comfy_table::{Cell, CellAlignment, Row};
use error::{Error, Result};
use hm_config::Config;
use tracing::trace;

const DEFAULT_CONFIG_FILE: &str = "hm.toml";

/// Inspect and exercise string-keyed hash maps.
#[derive(Parser)]
#[command(name = "hm", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten, next_help_heading = "Global Options")]
    globals: Globals,

    #[command(subcommand, next_help_heading = "Options")]
    command: Commands,
}

#[derive(Debug, clap::Args)]
pub struct Globals {
    /// Path to the configuration file.
    ///
    /// A missing file is not an error; defaults are used instead.
    #[arg(long, value_name = "PATH", global = true, default_value = DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,

    /// Override a configuration value for the duration of the command.
    #[arg(short, long, value_name = "KEY=VALUE", global = true, action = ArgAction::Append)]
    config: Vec<String>,

    /// Increase verbosity of logging.
    ///
    /// Can be specified multiple times to increase verbosity.
    ///
    /// Defaults to printing "error" messages. For each increase in verbosity,
    /// the log level is set to "warn", "info", "debug", and "trace"
    /// respectively.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output, including errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl fmt::Display for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entry(&"config_file", &self.globals.config_file)
            .entry(&"config", &self.globals.config)
            .entry(&"verbose", &self.globals.verbose)
            .entry(&"quiet", &self.globals.quiet)
            .finish()
    }
}

#[must_use]
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let is_tty = io::stdout().is_terminal();
    let quiet = cli.globals.quiet;

    configure_logging(cli.globals.verbose, quiet);
    trace!(command = cli.command.name(), arguments = %cli, "Starting CLI run.");

    let (ok, output) = match run_inner(cli) {
        Ok(output) if is_tty => (true, output_to_string(output)),
        Ok(output) => (true, parse_json_output(output)),
        Err(error) => (false, parse_error(&error, is_tty)),
    };

    let written = match (ok, quiet) {
        (true, _) => writeln!(io::stdout().lock(), "{output}"),
        (false, false) => writeln!(io::stderr().lock(), "{output}"),
        (false, true) => Ok(()),
    };

    if ok && written.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_inner(cli: Cli) -> Result<Success> {
    let mut config = load_config(&cli.globals.config_file)?;
    apply_cli_configs(&cli.globals.config, &mut config)?;
    let config = hm_config::build(config)?;

    cli.command.run(&config)
}

fn output_to_string(output: Success) -> String {
    match output {
        Success::Message(msg) => msg,
        Success::Table { header, rows } => table::list(header, rows),
        Success::Details { title, rows } => table::details(title.as_deref(), rows),
        Success::Json(value) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
    }
}

fn parse_json_output(output: Success) -> String {
    let value = match output {
        Success::Message(msg) => serde_json::json!({ "message": msg }),
        Success::Table { header, rows } => table::list_json(&header, rows),
        Success::Details { title, rows } => table::details_json(title.as_deref(), rows),
        Success::Json(value) => value,
    };

    serde_json::to_string(&value).unwrap_or_else(|_| value.to_string())
}

fn parse_error(error: &Error, is_tty: bool) -> String {
    let message = error.to_string();
    if !is_tty {
        return serde_json::json!({ "message": message, "code": 1 }).to_string();
    }

    let mut row = Row::new();
    row.add_cell(Cell::new("code").set_alignment(CellAlignment::Right))
        .add_cell(Cell::new(1).set_alignment(CellAlignment::Left));

    table::details(Some(&message), vec![row])
}

/// Load the configuration file, then apply environment overrides.
fn load_config(path: &Path) -> Result<Config> {
    trace!(path = %path.display(), "Loading configuration file.");
    let config = hm_config::load_from_file(path)?;

    hm_config::load_envs(config).map_err(Into::into)
}

/// Apply CLI config overrides to the [`Config`].
fn apply_cli_configs(overrides: &[String], config: &mut Config) -> Result<()> {
    trace!(overrides = ?overrides, "Applying CLI config overrides.");

    for field in overrides {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| Error::CliConfig(format!("expected KEY=VALUE, got \"{field}\"")))?;

        config.set(key.trim(), value.trim())?;
    }

    Ok(())
}

fn configure_logging(verbose: u8, quiet: bool) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::fmt;

    let mut level = match verbose {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    if quiet {
        level = LevelFilter::OFF;
    }

    let mut filter = vec!["off".to_owned()];
    for krate in ["cli", "config", "hash", "map"] {
        filter.push(format!("hm_{krate}={level}"));
    }

    let format = fmt::format().with_target(false).compact();

    if level < LevelFilter::DEBUG {
        tracing_subscriber::fmt()
            .event_format(format)
            .without_time()
            .with_ansi(true)
            .with_target(false)
            .with_writer(io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    } else {
        tracing_subscriber::fmt()
            .event_format(format)
            .with_ansi(true)
            .with_target(false)
            .with_writer(io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use clap::CommandFactory;
    use hm_config::Variant;
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_overrides_are_applied_in_order() {
        let mut config = Config::default();
        let overrides = vec![
            "map.variant=chained".to_owned(),
            "map.capacity = 7".to_owned(),
            "map.capacity=13".to_owned(),
        ];

        apply_cli_configs(&overrides, &mut config).unwrap();

        assert_eq!(config.map.variant, Variant::Chained);
        assert_eq!(config.map.capacity, 13);
    }

    #[test]
    fn cli_override_without_value_is_rejected() {
        let mut config = Config::default();

        assert_matches!(
            apply_cli_configs(&["map.capacity".to_owned()], &mut config),
            Err(Error::CliConfig(_))
        );
        assert_matches!(
            apply_cli_configs(&["map.buckets=3".to_owned()], &mut config),
            Err(Error::Config(hm_config::Error::UnknownConfigKey { .. }))
        );
    }

    #[test]
    fn error_output_without_tty_is_json() {
        let error = Error::UnknownScenario("nope".to_owned());
        let value: serde_json::Value = serde_json::from_str(&parse_error(&error, false)).unwrap();

        assert_eq!(value["code"], 1);
        assert!(value["message"].as_str().unwrap().contains("nope"));
    }
}
