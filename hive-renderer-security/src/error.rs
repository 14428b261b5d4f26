use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Renderer rejected the input because of insecure content: {0}")]
    SecurityViolation(String),
}

pub type Result<T> = std::result::Result<T, SecurityError>;
