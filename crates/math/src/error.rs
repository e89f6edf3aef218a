use thiserror::Error;

/// Failures reported by the checked (`try_*`) entry points.
///
/// The unchecked versions of the same operations never fail, degenerate
/// inputs there simply produce NaN or infinite components.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    #[error("cannot normalize a zero-length or non-finite vector")]
    ZeroLength,

    #[error("look direction is parallel to the up vector")]
    ParallelUp,

    #[error("vertical field of view {0} is outside (0, pi)")]
    FieldOfView(f32),

    #[error("aspect ratio {0} is zero or not finite")]
    AspectRatio(f32),

    #[error("near and far planes coincide at {0}")]
    DepthRange(f32),
}
