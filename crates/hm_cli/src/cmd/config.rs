use hm_config::Config;

use crate::cmd::{Output, Success};

#[derive(Debug, clap::Args)]
pub(crate) struct Show {
    /// Print the configuration as JSON instead of TOML.
    #[arg(long)]
    json: bool,
}

impl Show {
    pub(crate) fn run(self, config: &Config) -> Output {
        if self.json {
            return Ok(Success::Json(serde_json::to_value(config)?));
        }

        Ok(config.to_toml()?.into())
    }
}
