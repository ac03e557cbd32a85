/// Convenience result type used across datarain.
pub type RainResult<T> = Result<T, RainError>;

/// Top-level error taxonomy.
#[derive(thiserror::Error, Debug)]
pub enum RainError {
    /// Invalid configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised while drawing onto a surface (fonts, shaping, rasterization).
    #[error("render error: {0}")]
    Render(String),

    /// Errors raised by frame sinks while encoding output.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RainError {
    /// Build a [`RainError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RainError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`RainError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`RainError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
