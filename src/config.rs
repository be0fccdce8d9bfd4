//! Run configuration for graph building and derivation.
//!
//! ## Automatic threshold
//!
//! A useful neighbor threshold depends on the sampling density. The
//! k-th nearest neighbor heuristic picks the median, over all points, of the
//! distance to each point's k-th nearest neighbor: at that scale a typical
//! point sees about k neighbors.

use rayon::prelude::*;

use crate::cloud::PointCloud;
use crate::derive::SparsifyStrategy;
use crate::error::{check_threshold, CloudError, Result};

/// Configuration for neighbor building, refinement and sparsification
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Neighbor / separation threshold
    pub threshold: f64,
    /// Run the outer point loops on the rayon pool
    pub parallel: bool,
    /// Clouds smaller than this run sequentially even when `parallel` is set
    pub parallel_min_points: usize,
    /// Algorithm used by `sparsify_points`
    pub sparsify: SparsifyStrategy,
    /// k for k-NN threshold estimation
    pub knn_k: usize,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            parallel: true,
            parallel_min_points: 512,
            sparsify: SparsifyStrategy::Greedy,
            knn_k: 5,
        }
    }
}

impl CloudConfig {
    /// Default configuration at a given threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Force single-threaded execution
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Auto-configure the threshold from the cloud's k-NN distances
    pub fn auto_configure(cloud: &PointCloud) -> Result<Self> {
        let defaults = Self::default();
        let threshold = suggested_threshold(cloud, defaults.knn_k)?;
        Ok(Self {
            threshold,
            ..defaults
        })
    }

    pub fn validate(&self) -> Result<()> {
        check_threshold("threshold", self.threshold)?;
        if self.knn_k == 0 {
            return Err(CloudError::InvalidParameter {
                name: "knn_k",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Whether a pass over `n` points should use the rayon pool
    pub(crate) fn use_parallel(&self, n: usize) -> bool {
        self.parallel && n >= self.parallel_min_points
    }
}

/// Median k-th nearest neighbor distance.
///
/// Clouds with at most `k` points fall back to half the largest pairwise
/// distance.
pub fn suggested_threshold(cloud: &PointCloud, k: usize) -> Result<f64> {
    if cloud.is_empty() {
        return Err(CloudError::EmptyInput("suggested_threshold"));
    }
    if k == 0 {
        return Err(CloudError::InvalidParameter {
            name: "k",
            value: 0.0,
        });
    }
    let n = cloud.len();

    if n < k + 1 {
        let mut max = 0.0_f64;
        for i in 0..n {
            for j in i + 1..n {
                max = max.max(cloud.distance(i, j)?);
            }
        }
        return Ok(max / 2.0);
    }

    let mut knn_distances = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut distances = (0..n)
                .filter(|&j| j != i)
                .map(|j| cloud.distance(i, j))
                .collect::<Result<Vec<f64>>>()?;
            distances.sort_by(f64::total_cmp);
            Ok(distances[k - 1])
        })
        .collect::<Result<Vec<f64>>>()?;

    knn_distances.sort_by(f64::total_cmp);
    let mid = knn_distances.len() / 2;

    if knn_distances.len() % 2 == 0 {
        Ok((knn_distances[mid - 1] + knn_distances[mid]) / 2.0)
    } else {
        Ok(knn_distances[mid])
    }
}
