//! Error taxonomy for point-cloud operations.
//!
//! Contract violations (bad indices, ragged points, empty inputs, querying a
//! graph that was never built) are reported as values rather than aborting,
//! so long-running hosts can recover. File access failures carry the path.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the point-cloud store and its derivations.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("index {index} out of range for cloud of {len} points")]
    OutOfRange { index: usize, len: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("{0} requires a non-empty point cloud")]
    EmptyInput(&'static str),

    #[error("neighbor graph has not been computed")]
    GraphNotComputed,

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("operation cancelled")]
    Cancelled,

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl CloudError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures the caller may reasonably retry or report to a user
    /// (file access, cancellation) rather than a programming error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

/// Reject negative or NaN thresholds.
pub(crate) fn check_threshold(name: &'static str, value: f64) -> Result<()> {
    if value.is_nan() || value < 0.0 {
        return Err(CloudError::InvalidParameter { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_validation() {
        assert!(check_threshold("threshold", 0.0).is_ok());
        assert!(check_threshold("threshold", f64::INFINITY).is_ok());
        assert!(matches!(
            check_threshold("threshold", -1.0),
            Err(CloudError::InvalidParameter { name: "threshold", .. })
        ));
        assert!(check_threshold("threshold", f64::NAN).is_err());
    }

    #[test]
    fn test_recoverable_kinds() {
        let io = CloudError::io(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(io.is_recoverable());
        assert!(CloudError::Cancelled.is_recoverable());
        assert!(!CloudError::GraphNotComputed.is_recoverable());
        assert!(!CloudError::OutOfRange { index: 3, len: 2 }.is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = CloudError::OutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "index 5 out of range for cloud of 3 points");
        let err = CloudError::EmptyInput("split_points");
        assert_eq!(err.to_string(), "split_points requires a non-empty point cloud");
    }
}
