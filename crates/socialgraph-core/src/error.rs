use thiserror::Error;

/// Errors from the graph model and configuration layer.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid sex code {0}: expected 1 (Female) or 2 (Male)")]
    InvalidSex(i64),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
