use thiserror::Error;

pub type StatsResult<T> = Result<T, StatsError>;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("You must provide a token or workspace ID.")]
    MissingSettings,

    #[error("{0:#}")]
    Config(#[from] anyhow::Error),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),

    #[error("Unexpected report format: {0}")]
    MalformedResponse(String),

    #[error("Failed to render output: {0}")]
    Output(#[source] serde_json::Error),
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::MalformedResponse(err.to_string())
    }
}

impl StatsError {
    /// Usage errors exit with 2, everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            StatsError::MissingSettings => 2,
            _ => 1,
        }
    }
}
