/// Convenience result type used across the crate.
pub type InterpResult<T> = Result<T, InterpError>;

/// Error taxonomy for an interpolation run.
#[derive(thiserror::Error, Debug)]
pub enum InterpError {
    /// Malformed input image (zero height or width, wrong buffer size).
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Endpoint images differ in aligned shape.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Oracle call failed or returned malformed output.
    #[error("oracle error: {0}")]
    Oracle(String),

    /// Post-padding crop inconsistent with the recorded padding.
    #[error("crop mismatch: {0}")]
    CropMismatch(String),

    /// File read/write/encode failure.
    #[error("io error: {0}")]
    Io(String),

    /// Precondition or configuration failure.
    #[error("validation error: {0}")]
    Validation(String),

    /// A cancellation token was observed between oracle calls.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InterpError {
    /// Build an [`InterpError::InvalidDimension`] value.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build an [`InterpError::ShapeMismatch`] value.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Build an [`InterpError::Oracle`] value.
    pub fn oracle(msg: impl Into<String>) -> Self {
        Self::Oracle(msg.into())
    }

    /// Build an [`InterpError::CropMismatch`] value.
    pub fn crop_mismatch(msg: impl Into<String>) -> Self {
        Self::CropMismatch(msg.into())
    }

    /// Build an [`InterpError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build an [`InterpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`InterpError::Cancelled`] value.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Stable kind name, printed by the CLI on failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDimension(_) => "InvalidDimension",
            Self::ShapeMismatch(_) => "ShapeMismatch",
            Self::Oracle(_) => "OracleError",
            Self::CropMismatch(_) => "CropMismatch",
            Self::Io(_) => "IOError",
            Self::Validation(_) => "Validation",
            Self::Cancelled(_) => "Cancelled",
            Self::Other(_) => "Other",
        }
    }
}

impl From<std::io::Error> for InterpError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<image::ImageError> for InterpError {
    fn from(e: image::ImageError) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
