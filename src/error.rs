use thiserror::Error;

#[derive(Error, Debug)]
pub enum DesignError {
    #[error("Failed to generate design instructions")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    RemoteRejection(String),

    #[error("Failed to generate design instructions")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to generate design instructions")]
    MissingContent,

    #[error("Invalid fontName: {0}")]
    InvalidFont(String),

    #[error("Scene Error: {0}")]
    Scene(String),

    #[error("Storage Error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Configuration Error: {0}")]
    Config(String),
}
