use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    #[error("Invalid embedder configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, EmbedError>;
