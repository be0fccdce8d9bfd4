//! Euclidean distance between points.
//!
//! Distances are never cached: every call recomputes from raw coordinates.
//! The neighbor builder is the only heavy consumer and controls its own
//! access pattern.

use ndarray::ArrayView1;

use crate::error::{CloudError, Result};

/// L2 distance between two points of equal dimension.
pub fn euclidean(p: ArrayView1<f64>, q: ArrayView1<f64>) -> Result<f64> {
    if p.len() != q.len() {
        return Err(CloudError::DimensionMismatch {
            expected: p.len(),
            actual: q.len(),
        });
    }
    Ok(euclidean_unchecked(p, q))
}

/// L2 distance for rows already known to share a dimension.
#[inline]
pub(crate) fn euclidean_unchecked(p: ArrayView1<f64>, q: ArrayView1<f64>) -> f64 {
    p.iter()
        .zip(q.iter())
        .map(|(u, v)| (u - v) * (u - v))
        .sum::<f64>()
        .sqrt()
}
