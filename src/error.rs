//! Errors and degenerate geometry notes
use crate::Scalar;

/// Result type used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error produced by parsing, evaluating or constructing paths
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Malformed numeric literal or stray character in the path data
    #[error("tokenize error at offset {offset}: {reason} ({text:?})")]
    Tokenize {
        offset: usize,
        text: String,
        reason: &'static str,
    },
    /// Unknown command, wrong number of arguments or path not starting with move
    #[error("parse error at offset {offset}: {reason} ({text:?})")]
    Parse {
        offset: usize,
        text: String,
        reason: String,
    },
    /// Curve parameter outside of `[0, 1]`
    #[error("parameter {0} is outside of [0, 1]")]
    InvalidParameter(Scalar),
    /// Transformation can not be inverted
    #[error("transform is not invertible")]
    TransformSingularity,
    /// Segments do not form a valid path
    #[error("invalid path at segment {index}: {reason}")]
    InvalidPath { index: usize, reason: &'static str },
    /// Path does not contain any drawable segment
    #[error("path has no drawable segments")]
    EmptyPath,
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        Self::new(std::io::ErrorKind::InvalidData, error)
    }
}

/// Degenerate geometry which was replaced by a fallback value.
///
/// This is not an error, the operation that reports it still produces a
/// well defined result (a line instead of an arc, zero vector instead of
/// a derivative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Degenerate {
    /// Arc with zero `rx` or `ry`, converted to a line
    ZeroRadiusArc,
    /// Segment with coinciding control points, derivative is zero
    ZeroLength,
    /// Arc collapsed by a singular transformation, converted to a line
    SingularArcTransform,
}

/// Check that curve parameter is inside of `[0, 1]`
pub(crate) fn check_param(t: Scalar) -> Result<Scalar> {
    if (0.0..=1.0).contains(&t) {
        Ok(t)
    } else {
        Err(Error::InvalidParameter(t))
    }
}
