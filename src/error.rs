use thiserror::Error;

/// Top-level error type for the ribbon kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Errors in the caller-supplied input, checked before any work is done.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("nothing selected: {0}")]
    MissingSelection(&'static str),

    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("no usable geometry: {0}")]
    EmptyGeometry(String),

    #[error("insufficient points: {actual} given, at least {required} required")]
    InsufficientPoints { required: usize, actual: usize },
}

/// Errors related to degenerate geometric configurations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("path too short: length {length}")]
    PathTooShort { length: f64 },
}

/// Errors reported by the host model or other collaborators.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("element has kind {found}, expected {expected}")]
    WrongElementKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("element creation failed: {0}")]
    CreateFailed(String),
}

/// Convenience type alias for results using [`KernelError`].
pub type Result<T> = std::result::Result<T, KernelError>;

/// Returns an [`InputError::InvalidParameter`] unless `value` is finite and
/// strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidParameter { name, value }.into())
    }
}

/// Returns an [`InputError::InvalidParameter`] unless `value` is finite and
/// not negative.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidParameter { name, value }.into())
    }
}
