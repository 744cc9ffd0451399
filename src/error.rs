use thiserror::Error;

/// Instruct error types
#[derive(Error, Debug)]
pub enum InstructError {
    #[error("Pipeline request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid checkpoint: {0}")]
    Checkpoint(String),

    #[error("Generation returned no candidates")]
    EmptyGeneration,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for instruct operations
pub type Result<T> = std::result::Result<T, InstructError>;
