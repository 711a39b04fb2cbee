use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntegralError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Shape mismatch: expected {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Unknown element type: {0}")]
    UnknownElementType(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl IntegralError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IntegralError>;
