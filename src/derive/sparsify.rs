//! Sparsification
//!
//! Reduces a cloud to a T-separated subset S: every pair of retained points
//! is farther apart than T, and every removed point lies within T of some
//! retained point (covering radius ≤ T). Such a net preserves the coarse
//! shape of the cloud at scale T while bounding its size.

use ndarray::{ArrayView2, Axis};
use rayon::prelude::*;
use tracing::debug;

use crate::cloud::metric::euclidean_unchecked;
use crate::cloud::{CancellationToken, PointCloud};
use crate::config::CloudConfig;
use crate::error::{check_threshold, CloudError, Result};

/// How the retained subset is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SparsifyStrategy {
    /// Scan in index order, keeping points farther than T from all kept ones
    #[default]
    Greedy,
    /// Repeatedly keep the point farthest from the kept set, seeded at index 0
    FarthestPoint,
}

/// A sparsified cloud and the source indices it was drawn from
#[derive(Debug, Clone)]
pub struct Sparsification {
    pub cloud: PointCloud,
    /// Retained source indices, ascending
    pub retained: Vec<usize>,
    /// Size of the cloud this was drawn from
    pub source_len: usize,
}

impl Sparsification {
    /// Number of source points that were dropped
    pub fn removed(&self) -> usize {
        self.source_len - self.retained.len()
    }

    /// Largest distance from a source point to its nearest retained point
    pub fn covering_radius(&self, source: &PointCloud) -> Result<f64> {
        let mut radius = 0.0_f64;
        for i in 0..source.len() {
            let mut nearest = f64::INFINITY;
            for &r in &self.retained {
                nearest = nearest.min(source.distance(i, r)?);
            }
            radius = radius.max(nearest);
        }
        Ok(radius)
    }
}

/// Sparsify `source` at `threshold` with the greedy strategy
pub fn sparsify_points(source: &PointCloud, threshold: f64) -> Result<Sparsification> {
    sparsify_points_with(
        source,
        &CloudConfig::with_threshold(threshold),
        &CancellationToken::new(),
    )
}

/// Sparsify `source` at `config.threshold` using `config.sparsify`.
///
/// Does not require or modify the source's neighbor graph.
#[tracing::instrument(level = "debug", skip_all, fields(n = source.len(), threshold = config.threshold))]
pub fn sparsify_points_with(
    source: &PointCloud,
    config: &CloudConfig,
    cancel: &CancellationToken,
) -> Result<Sparsification> {
    check_threshold("threshold", config.threshold)?;
    if source.is_empty() {
        return Err(CloudError::EmptyInput("sparsify_points"));
    }

    let points = source.points();
    let retained = match config.sparsify {
        SparsifyStrategy::Greedy => greedy(points, config.threshold, cancel)?,
        SparsifyStrategy::FarthestPoint => farthest_point(
            points,
            config.threshold,
            config.use_parallel(source.len()),
            cancel,
        )?,
    };

    let cloud = PointCloud::from_array(points.select(Axis(0), &retained))?;
    debug!(
        strategy = ?config.sparsify,
        retained = retained.len(),
        removed = source.len() - retained.len(),
        "sparsification complete"
    );

    Ok(Sparsification {
        cloud,
        retained,
        source_len: source.len(),
    })
}

fn greedy(points: ArrayView2<f64>, threshold: f64, cancel: &CancellationToken) -> Result<Vec<usize>> {
    let mut kept: Vec<usize> = Vec::new();
    for i in 0..points.nrows() {
        cancel.check()?;
        let p = points.row(i);
        if kept
            .iter()
            .all(|&k| euclidean_unchecked(p, points.row(k)) > threshold)
        {
            kept.push(i);
        }
    }
    Ok(kept)
}

fn farthest_point(
    points: ArrayView2<f64>,
    threshold: f64,
    parallel: bool,
    cancel: &CancellationToken,
) -> Result<Vec<usize>> {
    let n = points.nrows();
    let seed = points.row(0);
    let mut nearest: Vec<f64> = (0..n)
        .map(|j| euclidean_unchecked(seed, points.row(j)))
        .collect();
    let mut kept = vec![0];

    loop {
        cancel.check()?;

        // First index wins ties
        let (far, dist) = nearest
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(bi, bd), (j, &d)| {
                if d > bd {
                    (j, d)
                } else {
                    (bi, bd)
                }
            });
        if dist <= threshold {
            break;
        }
        kept.push(far);

        let f = points.row(far);
        if parallel {
            nearest.par_iter_mut().enumerate().for_each(|(j, slot)| {
                *slot = slot.min(euclidean_unchecked(f, points.row(j)));
            });
        } else {
            for (j, slot) in nearest.iter_mut().enumerate() {
                *slot = slot.min(euclidean_unchecked(f, points.row(j)));
            }
        }
    }

    kept.sort_unstable();
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    fn assert_separated(sparse: &Sparsification, threshold: f64) {
        let cloud = &sparse.cloud;
        for i in 0..cloud.len() {
            for j in i + 1..cloud.len() {
                assert!(cloud.distance(i, j).unwrap() > threshold);
            }
        }
    }

    #[test]
    fn test_greedy_on_line() {
        let cloud =
            PointCloud::from_rows((0..10).map(|i| vec![i as f64 * 0.4]).collect()).unwrap();
        let sparse = sparsify_points(&cloud, 1.0).unwrap();

        // 0.0, 1.2, 2.4, 3.6
        assert_eq!(sparse.retained, vec![0, 3, 6, 9]);
        assert_eq!(sparse.cloud.len(), 4);
        assert_eq!(sparse.source_len, 10);
        assert_eq!(sparse.removed(), 6);
        assert_eq!(sparse.cloud.point(1).unwrap()[0], cloud.point(3).unwrap()[0]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let cloud = PointCloud::from_rows(vec![vec![1.0, 1.0]; 5]).unwrap();
        for strategy in [SparsifyStrategy::Greedy, SparsifyStrategy::FarthestPoint] {
            let config = CloudConfig {
                threshold: 0.0,
                sparsify: strategy,
                ..CloudConfig::default()
            };
            let sparse = sparsify_points_with(&cloud, &config, &CancellationToken::new()).unwrap();
            assert_eq!(sparse.retained, vec![0]);
        }
    }

    #[test]
    fn test_packing_and_covering() {
        for strategy in [SparsifyStrategy::Greedy, SparsifyStrategy::FarthestPoint] {
            for seed in 0..6 {
                let cloud = sample::gaussian_blob(150, 3, 1.0, seed).unwrap();
                let threshold = 0.5;
                let config = CloudConfig {
                    threshold,
                    sparsify: strategy,
                    parallel_min_points: 1,
                    ..CloudConfig::default()
                };
                let sparse =
                    sparsify_points_with(&cloud, &config, &CancellationToken::new()).unwrap();

                assert!(!sparse.retained.is_empty());
                assert!(sparse.retained.windows(2).all(|w| w[0] < w[1]));
                assert_separated(&sparse, threshold);
                assert!(sparse.covering_radius(&cloud).unwrap() <= threshold);
            }
        }
    }

    #[test]
    fn test_removed_ignores_later_clouds() {
        let cloud = sample::uniform_box(40, 2, 4.0, 12).unwrap();
        let sparse = sparsify_points(&cloud, 0.5).unwrap();
        let expected = cloud.len() - sparse.retained.len();
        drop(cloud);

        // Counted against the original cloud, not whatever the caller holds now
        let small = sample::uniform_box(2, 2, 1.0, 3).unwrap();
        assert!(small.len() < sparse.retained.len());
        assert_eq!(sparse.removed(), expected);
    }

    #[test]
    fn test_large_threshold_keeps_one() {
        let cloud = sample::uniform_box(50, 2, 1.0, 4).unwrap();
        let sparse = sparsify_points(&cloud, 10.0).unwrap();
        assert_eq!(sparse.retained, vec![0]);
    }

    #[test]
    fn test_source_graph_untouched() {
        let mut cloud = sample::uniform_box(30, 2, 1.0, 8).unwrap();
        cloud.find_neighbors(0.3).unwrap();
        let edges = cloud.graph().unwrap().edge_count();

        let sparse = sparsify_points(&cloud, 0.3).unwrap();
        assert!(!sparse.cloud.has_graph());
        assert_eq!(cloud.graph().unwrap().edge_count(), edges);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            sparsify_points(&PointCloud::new(), 1.0),
            Err(CloudError::EmptyInput("sparsify_points"))
        ));
        let cloud = sample::uniform_box(5, 2, 1.0, 1).unwrap();
        assert!(matches!(
            sparsify_points(&cloud, -0.1),
            Err(CloudError::InvalidParameter { .. })
        ));

        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(
            sparsify_points_with(&cloud, &CloudConfig::default(), &token),
            Err(CloudError::Cancelled)
        ));
    }
}
