//! Epsilon-neighborhood graph
//!
//! For a threshold T, points i < j are neighbors iff d(i, j) ≤ T. This is the
//! 1-skeleton of the Vietoris-Rips complex VR_T(X).
//!
//! Storage is triangular: the list for point i only names points j > i, which
//! halves the pairwise work and never stores an edge twice. Consumers that
//! need every neighbor of i regardless of index order should use
//! [`NeighborGraph::symmetric_neighbors`].

use ndarray::ArrayView2;
use rayon::prelude::*;
use tracing::debug;

use super::cancel::CancellationToken;
use super::metric::euclidean_unchecked;
use crate::config::CloudConfig;
use crate::error::{check_threshold, CloudError, Result};

/// A neighbor of some point: its index and the distance to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborEntry {
    pub index: usize,
    pub distance: f64,
}

impl NeighborEntry {
    pub fn new(index: usize, distance: f64) -> Self {
        Self { index, distance }
    }
}

/// Per-point neighbor lists at a fixed threshold
#[derive(Debug, Clone)]
pub struct NeighborGraph {
    threshold: f64,
    lists: Vec<Vec<NeighborEntry>>,
}

impl NeighborGraph {
    /// Build the graph over the rows of `points`.
    ///
    /// Each worker produces whole neighbor lists and lists are collected in
    /// index order, so the result is identical for any worker count.
    #[tracing::instrument(level = "debug", skip_all, fields(n = points.nrows(), threshold = threshold))]
    pub(crate) fn build(
        points: ArrayView2<f64>,
        threshold: f64,
        config: &CloudConfig,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        check_threshold("threshold", threshold)?;
        let n = points.nrows();

        let row = |i: usize| -> Result<Vec<NeighborEntry>> {
            cancel.check()?;
            Ok(Self::neighbors_of(points, i, threshold))
        };

        let lists = if config.use_parallel(n) {
            (0..n).into_par_iter().map(row).collect::<Result<Vec<_>>>()?
        } else {
            (0..n).map(row).collect::<Result<Vec<_>>>()?
        };

        let graph = Self { threshold, lists };
        debug!(edges = graph.edge_count(), "neighbor graph built");
        Ok(graph)
    }

    /// Neighbors of `i` among the points with larger index
    fn neighbors_of(points: ArrayView2<f64>, i: usize, threshold: f64) -> Vec<NeighborEntry> {
        let p = points.row(i);
        (i + 1..points.nrows())
            .filter_map(|j| {
                let d = euclidean_unchecked(p, points.row(j));
                (d <= threshold).then_some(NeighborEntry::new(j, d))
            })
            .collect()
    }

    /// Threshold the graph was built at
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of points (one list per point)
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Average number of neighbors per point (counting both ends)
    pub fn mean_degree(&self) -> f64 {
        if self.lists.is_empty() {
            return 0.0;
        }
        2.0 * self.edge_count() as f64 / self.lists.len() as f64
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.lists.len() {
            return Err(CloudError::OutOfRange {
                index,
                len: self.lists.len(),
            });
        }
        Ok(())
    }

    /// Stored (upper-triangular) neighbor list of `index`
    pub fn neighbors(&self, index: usize) -> Result<&[NeighborEntry]> {
        self.check_index(index)?;
        Ok(&self.lists[index])
    }

    /// All neighbors of `index`, lower and higher indices alike, sorted by index.
    pub fn symmetric_neighbors(&self, index: usize) -> Result<Vec<NeighborEntry>> {
        self.check_index(index)?;

        // Lists are sorted by neighbor index, so each earlier list can be
        // searched for `index` directly.
        let mut all: Vec<NeighborEntry> = self.lists[..index]
            .iter()
            .enumerate()
            .filter_map(|(h, list)| {
                list.binary_search_by_key(&index, |e| e.index)
                    .ok()
                    .map(|pos| NeighborEntry::new(h, list[pos].distance))
            })
            .collect();
        all.extend_from_slice(&self.lists[index]);
        Ok(all)
    }

    /// Number of neighbors of `index` in the undirected graph
    pub fn degree(&self, index: usize) -> Result<usize> {
        Ok(self.symmetric_neighbors(index)?.len())
    }

    /// Iterate edges as (i, j, distance) with i < j
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.lists
            .iter()
            .enumerate()
            .flat_map(|(i, list)| list.iter().map(move |e| (i, e.index, e.distance)))
    }

    /// Count connected components using Union-Find (β₀ at this threshold)
    pub fn component_count(&self) -> usize {
        let n = self.lists.len();
        let mut parent: Vec<usize> = (0..n).collect();
        let mut rank = vec![0usize; n];

        fn find(parent: &mut [usize], i: usize) -> usize {
            if parent[i] != i {
                parent[i] = find(parent, parent[i]);
            }
            parent[i]
        }

        let mut components = n;
        for (i, j, _) in self.edges() {
            let ri = find(&mut parent, i);
            let rj = find(&mut parent, j);
            if ri == rj {
                continue;
            }
            if rank[ri] < rank[rj] {
                parent[ri] = rj;
            } else if rank[ri] > rank[rj] {
                parent[rj] = ri;
            } else {
                parent[rj] = ri;
                rank[ri] += 1;
            }
            components -= 1;
        }

        components
    }
}
