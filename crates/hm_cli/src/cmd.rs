mod config;
mod demo;
mod inspect;

use comfy_table::Row;
use hm_config::Config;
use serde_json::Value;

use crate::error::Result;

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Commands {
    /// Run the worked examples against the configured map.
    Demo(demo::Demo),

    /// Build a map from a list of operations and print its buckets.
    #[command(visible_alias = "i")]
    Inspect(inspect::Inspect),

    /// Show the effective configuration.
    #[command(visible_alias = "cfg")]
    Config(config::Show),
}

impl Commands {
    pub(crate) fn run(self, config: &Config) -> Output {
        match self {
            Commands::Demo(args) => args.run(&config.map),
            Commands::Inspect(args) => args.run(&config.map),
            Commands::Config(args) => args.run(config),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Commands::Demo(_) => "demo",
            Commands::Inspect(_) => "inspect",
            Commands::Config(_) => "config",
        }
    }
}

pub(crate) type Output = Result<Success>;

#[derive(Debug)]
pub(crate) enum Success {
    /// A successful response with a message to be printed.
    Message(String),

    /// A successful response with a table to be printed.
    Table { header: Row, rows: Vec<Row> },

    /// A successful response with a title and rows of key/value pairs.
    Details { title: Option<String>, rows: Vec<Row> },

    /// A successful response with a JSON value to be printed.
    Json(Value),
}

impl From<String> for Success {
    fn from(msg: String) -> Self {
        Self::Message(msg)
    }
}

impl From<Value> for Success {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
