use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenwatchError {
    #[error("VAULT_TOKEN is not set")]
    MissingVaultToken,

    #[error("invalid value '{value}' for {var}")]
    InvalidEnvVar { var: String, value: String },

    #[error("http client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TokenwatchError>;
