// Copyright @yucwang 2026

use thiserror::Error;

/// Failures raised while building or activating a scene. Rendering itself
/// never fails: numerical trouble yields a zero contribution instead.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("Property \"{name}\" has the wrong type (expected {expected})")]
    InvalidProperty { name: String, expected: &'static str },
}

pub type Result<T> = std::result::Result<T, RenderError>;
