use thiserror::Error;

use crate::transform::DecodeError;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unexpected response {status} from {url}")]
    Retrieval {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Submission failed: {message}")]
    Submission { message: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, MigrationError>;
