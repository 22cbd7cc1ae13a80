pub(crate) type Result<T> = std::result::Result<T, Error>;

/// CLI Error types
#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] hm_config::Error),

    #[error("CLI Config error: {0}")]
    CliConfig(String),

    #[error("Map error: {0}")]
    Map(#[from] hm_map::Error),

    #[error("Unknown demo scenario: {0}. Use `hm demo --list` to list scenarios.")]
    UnknownScenario(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
