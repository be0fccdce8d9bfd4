//! Index-addressable point store with an optional neighbor graph.

use std::path::Path;

use ndarray::{Array2, ArrayView1, ArrayView2};

use super::cancel::CancellationToken;
use super::graph::{NeighborEntry, NeighborGraph};
use super::metric::euclidean_unchecked;
use crate::config::CloudConfig;
use crate::error::{CloudError, Result};
use crate::io;

/// An ordered collection of same-dimension points.
///
/// Points are stored as rows of an `Array2<f64>`; the dimension is fixed by
/// the first inserted point and enforced on every later insertion. Any
/// change to the points discards a previously computed neighbor graph.
#[derive(Debug, Clone)]
pub struct PointCloud {
    points: Array2<f64>,
    graph: Option<NeighborGraph>,
}

impl PointCloud {
    /// Create an empty cloud
    pub fn new() -> Self {
        Self {
            points: Array2::zeros((0, 0)),
            graph: None,
        }
    }

    /// Create a cloud from a list of points
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let mut cloud = Self::new();
        cloud.set_points(rows)?;
        Ok(cloud)
    }

    /// Wrap an `[n, d]` array, one point per row
    pub fn from_array(points: Array2<f64>) -> Result<Self> {
        if points.nrows() > 0 && points.ncols() == 0 {
            return Err(CloudError::EmptyInput("from_array"));
        }
        Ok(Self {
            points,
            graph: None,
        })
    }

    /// Build from row-major coordinates of `dim`-dimensional points
    pub(crate) fn from_flat(dim: usize, data: Vec<f64>) -> Result<Self> {
        if dim == 0 || data.len() % dim != 0 {
            return Err(CloudError::DimensionMismatch {
                expected: dim,
                actual: data.len(),
            });
        }
        let rows = data.len() / dim;
        Ok(Self {
            points: Array2::from_shape_vec((rows, dim), data)?,
            graph: None,
        })
    }

    /// Load points from a whitespace/separator-delimited text file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        io::load_points(path)
    }

    /// Write the points as CSV with an `x0,x1,...` header
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        io::export_csv(self, path)
    }

    /// Append one point
    pub fn add_point(&mut self, point: &[f64]) -> Result<()> {
        if point.is_empty() {
            return Err(CloudError::EmptyInput("add_point"));
        }
        if self.is_empty() {
            self.points = Array2::zeros((0, point.len()));
        } else if point.len() != self.points.ncols() {
            return Err(CloudError::DimensionMismatch {
                expected: self.points.ncols(),
                actual: point.len(),
            });
        }
        self.points.push_row(ArrayView1::from(point))?;
        self.graph = None;
        Ok(())
    }

    /// Replace every point. On error the cloud is left unchanged.
    pub fn set_points(&mut self, rows: Vec<Vec<f64>>) -> Result<()> {
        let Some(first) = rows.first() else {
            *self = Self::new();
            return Ok(());
        };
        let dim = first.len();
        if dim == 0 {
            return Err(CloudError::EmptyInput("set_points"));
        }

        let mut data = Vec::with_capacity(rows.len() * dim);
        for row in &rows {
            if row.len() != dim {
                return Err(CloudError::DimensionMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        *self = Self::from_flat(dim, data)?;
        Ok(())
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Coordinate count of the points; undefined for an empty cloud
    pub fn dimension(&self) -> Result<usize> {
        if self.is_empty() {
            return Err(CloudError::EmptyInput("dimension"));
        }
        Ok(self.points.ncols())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(CloudError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Point at `index`
    pub fn point(&self, index: usize) -> Result<ArrayView1<'_, f64>> {
        self.check_index(index)?;
        Ok(self.points.row(index))
    }

    /// All points as an `[n, d]` view
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Iterate over points in index order
    pub fn iter(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> + '_ {
        self.points.rows().into_iter()
    }

    /// Consume the cloud, returning the point array
    pub fn into_array(self) -> Array2<f64> {
        self.points
    }

    /// Euclidean distance between the points at `i` and `j`
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        self.check_index(i)?;
        self.check_index(j)?;
        Ok(euclidean_unchecked(self.points.row(i), self.points.row(j)))
    }

    /// Compute the neighbor graph at `threshold`, replacing any previous one
    pub fn find_neighbors(&mut self, threshold: f64) -> Result<()> {
        let config = CloudConfig::with_threshold(threshold);
        self.find_neighbors_with(&config, &CancellationToken::new())
    }

    /// Compute the neighbor graph at `config.threshold`.
    ///
    /// On error (including cancellation) the previous graph is kept.
    pub fn find_neighbors_with(
        &mut self,
        config: &CloudConfig,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let graph = NeighborGraph::build(self.points.view(), config.threshold, config, cancel)?;
        self.graph = Some(graph);
        Ok(())
    }

    /// Whether a neighbor graph is available
    pub fn has_graph(&self) -> bool {
        self.graph.is_some()
    }

    /// The computed neighbor graph
    pub fn graph(&self) -> Result<&NeighborGraph> {
        self.graph.as_ref().ok_or(CloudError::GraphNotComputed)
    }

    /// Stored neighbors of `index` (only higher indices)
    pub fn neighbors(&self, index: usize) -> Result<&[NeighborEntry]> {
        self.check_index(index)?;
        self.graph()?.neighbors(index)
    }

    /// Every neighbor of `index`, sorted by index
    pub fn symmetric_neighbors(&self, index: usize) -> Result<Vec<NeighborEntry>> {
        self.check_index(index)?;
        self.graph()?.symmetric_neighbors(index)
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;

    fn triangle() -> PointCloud {
        PointCloud::from_rows(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_incremental_insertion() {
        let mut cloud = PointCloud::new();
        assert!(cloud.is_empty());
        assert!(matches!(cloud.dimension(), Err(CloudError::EmptyInput(_))));

        cloud.add_point(&[1.0, 2.0, 3.0]).unwrap();
        cloud.add_point(&[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.dimension().unwrap(), 3);
        assert_eq!(cloud.point(1).unwrap(), array![4.0, 5.0, 6.0]);

        assert!(matches!(
            cloud.add_point(&[1.0, 2.0]),
            Err(CloudError::DimensionMismatch { expected: 3, actual: 2 })
        ));
        assert!(cloud.add_point(&[]).is_err());
        assert_eq!(cloud.len(), 2);
    }

    #[test]
    fn test_bulk_replace() {
        let mut cloud = triangle();
        cloud.find_neighbors(1.5).unwrap();

        cloud.set_points(vec![vec![5.0], vec![6.0]]).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.dimension().unwrap(), 1);
        assert!(!cloud.has_graph());

        let ragged = cloud.set_points(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(ragged, Err(CloudError::DimensionMismatch { .. })));
        // unchanged on error
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.dimension().unwrap(), 1);

        cloud.set_points(Vec::new()).unwrap();
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_out_of_range_and_graph_errors() {
        let mut cloud = triangle();
        assert!(matches!(
            cloud.point(3),
            Err(CloudError::OutOfRange { index: 3, len: 3 })
        ));
        assert!(cloud.distance(0, 7).is_err());
        assert!(matches!(cloud.neighbors(0), Err(CloudError::GraphNotComputed)));
        assert!(matches!(cloud.neighbors(9), Err(CloudError::OutOfRange { .. })));

        cloud.find_neighbors(1.5).unwrap();
        assert!(cloud.neighbors(2).unwrap().is_empty());
        assert!(matches!(cloud.neighbors(3), Err(CloudError::OutOfRange { .. })));
    }

    #[test]
    fn test_insertion_discards_graph() {
        let mut cloud = triangle();
        cloud.find_neighbors(1.5).unwrap();
        cloud.add_point(&[2.0, 2.0]).unwrap();
        assert!(matches!(cloud.graph(), Err(CloudError::GraphNotComputed)));
    }

    #[test]
    fn test_recompute_replaces_graph() {
        let mut cloud = triangle();
        cloud.find_neighbors(1.5).unwrap();
        assert_eq!(cloud.graph().unwrap().edge_count(), 3);

        cloud.find_neighbors(1.0).unwrap();
        assert_eq!(cloud.graph().unwrap().edge_count(), 2);
        assert_eq!(cloud.graph().unwrap().threshold(), 1.0);
    }

    #[test]
    fn test_failed_build_keeps_graph() {
        let mut cloud = triangle();
        cloud.find_neighbors(1.5).unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let result = cloud.find_neighbors_with(&CloudConfig::with_threshold(0.1), &token);
        assert!(matches!(result, Err(CloudError::Cancelled)));
        assert_eq!(cloud.graph().unwrap().threshold(), 1.5);
    }

    #[test]
    fn test_distance_symmetry_and_triangle_inequality() {
        for seed in 0..8 {
            let cloud = sample::uniform_box(24, 4, 2.0, seed).unwrap();
            let n = cloud.len();
            for i in 0..n {
                assert_eq!(cloud.distance(i, i).unwrap(), 0.0);
                for j in 0..n {
                    let dij = cloud.distance(i, j).unwrap();
                    assert!(dij >= 0.0);
                    assert_eq!(dij, cloud.distance(j, i).unwrap());
                    for k in 0..n {
                        let dik = cloud.distance(i, k).unwrap();
                        let dkj = cloud.distance(k, j).unwrap();
                        assert!(dij <= dik + dkj + 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_neighbor_invariants() {
        for seed in 0..8 {
            let mut cloud = sample::gaussian_blob(60, 3, 1.0, seed).unwrap();
            let threshold = 0.8;
            cloud.find_neighbors(threshold).unwrap();

            for i in 0..cloud.len() {
                for entry in cloud.neighbors(i).unwrap() {
                    assert!(entry.index > i);
                    assert!(entry.distance <= threshold);
                    assert_abs_diff_eq!(
                        entry.distance,
                        cloud.distance(i, entry.index).unwrap(),
                        epsilon = 1e-12
                    );
                }
            }

            // Every qualifying pair is recorded
            let mut expected = 0;
            for i in 0..cloud.len() {
                for j in i + 1..cloud.len() {
                    if cloud.distance(i, j).unwrap() <= threshold {
                        expected += 1;
                    }
                }
            }
            assert_eq!(cloud.graph().unwrap().edge_count(), expected);
        }
    }

    #[test]
    fn test_zero_threshold_without_duplicates() {
        let mut cloud = sample::uniform_box(50, 2, 1.0, 7).unwrap();
        cloud.find_neighbors(0.0).unwrap();
        for i in 0..cloud.len() {
            assert!(cloud.neighbors(i).unwrap().is_empty());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let cloud = sample::gaussian_blob(300, 3, 1.0, 11).unwrap();
        let parallel = CloudConfig {
            threshold: 0.6,
            parallel_min_points: 1,
            ..CloudConfig::default()
        };
        let sequential = parallel.clone().sequential();
        let token = CancellationToken::new();

        let mut a = cloud.clone();
        let mut b = cloud;
        a.find_neighbors_with(&parallel, &token).unwrap();
        b.find_neighbors_with(&sequential, &token).unwrap();

        for i in 0..a.len() {
            assert_eq!(a.neighbors(i).unwrap(), b.neighbors(i).unwrap());
        }
    }

    #[test]
    fn test_symmetric_query_through_cloud() {
        let mut cloud = triangle();
        cloud.find_neighbors(1.5).unwrap();
        let sym = cloud.symmetric_neighbors(1).unwrap();
        assert_eq!(sym.len(), 2);
        assert_relative_eq!(sym[1].distance, 2.0_f64.sqrt());
    }
}
