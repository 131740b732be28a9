use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset: {0}")]
    Data(String),
}

pub type Result<T> = std::result::Result<T, ScrubError>;
