use std::{env, fs, io, path::Path};

use tracing::{debug, trace};

use crate::{Config, Error, error::Result};

/// Environment variables mapped to the config key they override.
const ENV_VARS: [(&str, &str); 4] = [
    ("HM_MAP_VARIANT", "map.variant"),
    ("HM_MAP_CAPACITY", "map.capacity"),
    ("HM_MAP_HASHER", "map.hasher"),
    ("HM_MAP_GROWTH", "map.growth"),
];

/// Load a TOML configuration file.
///
/// A missing file is not an error; it yields the default configuration.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            trace!(path = %path.display(), "No configuration file found, using defaults.");
            return Ok(Config::default());
        }
        Err(error) => return Err(error.into()),
    };

    debug!(path = %path.display(), "Loading configuration file.");
    toml::from_str(&content).map_err(Into::into)
}

/// Apply `HM_MAP_*` environment variables on top of `config`.
pub fn load_envs(mut config: Config) -> Result<Config> {
    trace!("Loading environment variable configuration.");

    for (var, key) in ENV_VARS {
        let Ok(value) = env::var(var) else {
            continue;
        };

        trace!(var, key, value = %value, "Applying environment variable.");
        config.set(key, &value).map_err(|error| Error::Env {
            var,
            source: Box::new(error),
        })?;
    }

    Ok(config)
}

/// Validate and return the final configuration.
pub fn build(config: Config) -> Result<Config> {
    config.validate()?;
    Ok(config)
}
