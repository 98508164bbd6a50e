//! Error type shared by the solver, geometry, sampler and resampler.

/// Reasons a sampling or resampling request can fail.
///
/// Every variant is deterministic for identical inputs; retrying a failed
/// call cannot succeed.
#[derive(Clone, Debug, PartialEq)]
pub enum ResampleError {
    /// Missing or invalid grid field, spacing, size or buffer length.
    Configuration { reason: String },
    /// A point, index or grid field has the wrong number of components.
    DimensionMismatch { expected: usize, actual: usize },
    /// The direction matrix (or the composed index system) is not invertible.
    SingularMatrix,
    /// A fill policy code or name outside `Zero`/`Nearest`.
    UnsupportedFillPolicy { value: String },
    /// Only 2D and 3D images are supported.
    UnsupportedDimension { dimension: usize },
    /// Direct pixel access outside the buffer.
    IndexOutOfRange { index: usize, len: usize },
}

impl ResampleError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        ResampleError::Configuration {
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's request rather than the data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ResampleError::Configuration { .. }
                | ResampleError::DimensionMismatch { .. }
                | ResampleError::UnsupportedDimension { .. }
        )
    }
}

impl std::fmt::Display for ResampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleError::Configuration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            ResampleError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            ResampleError::SingularMatrix => write!(f, "matrix is singular or nearly singular"),
            ResampleError::UnsupportedFillPolicy { value } => {
                write!(f, "unsupported fill policy: {value}")
            }
            ResampleError::UnsupportedDimension { dimension } => {
                write!(f, "unsupported image dimension {dimension} (expected 2 or 3)")
            }
            ResampleError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for buffer of {len} pixels")
            }
        }
    }
}

impl std::error::Error for ResampleError {}

pub type Result<T> = std::result::Result<T, ResampleError>;
