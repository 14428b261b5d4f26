//! Error types for rendering

use hive_renderer_embed::EmbedError;
use hive_renderer_security::SecurityError;
use thiserror::Error;

/// Errors surfaced by the renderer.
///
/// Link and embed problems never show up here: they are degraded to safe
/// text inside the output instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Invalid construction-time options
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Invalid localization strings
    #[error("Invalid localization: {0}")]
    Localization(String),

    /// Render input rejected before processing
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Security gate rejected the rendered output
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl RenderError {
    /// Construction-time failure (options or localization)
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Localization(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_security_violation(&self) -> bool {
        matches!(self, Self::SecurityViolation(_))
    }
}

impl From<SecurityError> for RenderError {
    fn from(err: SecurityError) -> Self {
        match err {
            SecurityError::Configuration(msg) => Self::Configuration(msg),
            SecurityError::SecurityViolation(msg) => Self::SecurityViolation(msg),
        }
    }
}

impl From<EmbedError> for RenderError {
    fn from(err: EmbedError) -> Self {
        match err {
            EmbedError::Configuration(msg) => Self::Configuration(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_error_mapping() {
        let err: RenderError = SecurityError::SecurityViolation("script".into()).into();
        assert!(err.is_security_violation());

        let err: RenderError = SecurityError::Configuration("baseUrl".into()).into();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RenderError::InvalidInput("empty".into()).to_string(),
            "Invalid input: empty"
        );
    }
}
