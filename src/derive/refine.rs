//! Barycentric Refinement
//!
//! Every neighbor pair {i, j} and every neighbor triple {i, j, k} drawn from
//! i's stored list spans an edge or triangle of the Rips complex. Inserting
//! their barycenters approximates interior points of those simplices and
//! densifies the cloud for the next, finer scale.
//!
//! Output order for each source point i: the copy of xᵢ, then the pair
//! barycenters in neighbor-list order, then the triple barycenters in
//! lexicographic (j, k) order. All of i's pairs precede any of its triples;
//! pairs and triples are not interleaved per neighbor.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;
use tracing::debug;

use crate::cloud::{CancellationToken, NeighborEntry, PointCloud};
use crate::config::CloudConfig;
use crate::error::{CloudError, Result};

/// A refined cloud and how many barycenters went into it
#[derive(Debug, Clone)]
pub struct Refinement {
    pub cloud: PointCloud,
    /// Pair barycenters inserted
    pub pairs: usize,
    /// Triple barycenters inserted
    pub triples: usize,
}

impl Refinement {
    /// Total number of inserted points
    pub fn inserted(&self) -> usize {
        self.pairs + self.triples
    }
}

/// Output produced for a single source point
struct Segment {
    coords: Vec<f64>,
    pairs: usize,
    triples: usize,
}

/// Coordinate-wise mean of a set of points
pub fn barycenter(points: &[ArrayView1<f64>]) -> Result<Array1<f64>> {
    let first = points.first().ok_or(CloudError::EmptyInput("barycenter"))?;
    if let Some(bad) = points.iter().find(|p| p.len() != first.len()) {
        return Err(CloudError::DimensionMismatch {
            expected: first.len(),
            actual: bad.len(),
        });
    }
    let mut out = Vec::with_capacity(first.len());
    push_barycenter(&mut out, points);
    Ok(Array1::from(out))
}

#[inline]
fn push_barycenter(out: &mut Vec<f64>, points: &[ArrayView1<f64>]) {
    let weight = points.len() as f64;
    for c in 0..points[0].len() {
        out.push(points.iter().map(|p| p[c]).sum::<f64>() / weight);
    }
}

fn refine_point(points: ArrayView2<f64>, i: usize, neighbors: &[NeighborEntry]) -> Segment {
    let k = neighbors.len();
    let dim = points.ncols();
    let mut coords = Vec::with_capacity((1 + k + k * k.saturating_sub(1) / 2) * dim);

    let p = points.row(i);
    coords.extend(p.iter().copied());

    for e in neighbors {
        push_barycenter(&mut coords, &[p, points.row(e.index)]);
    }

    let mut triples = 0;
    for (a, ea) in neighbors.iter().enumerate() {
        let q = points.row(ea.index);
        for eb in &neighbors[a + 1..] {
            push_barycenter(&mut coords, &[p, q, points.row(eb.index)]);
            triples += 1;
        }
    }

    Segment {
        coords,
        pairs: k,
        triples,
    }
}

/// Refine `source` using its computed neighbor graph
pub fn split_points(source: &PointCloud) -> Result<Refinement> {
    split_points_with(source, &CloudConfig::default(), &CancellationToken::new())
}

/// Refine `source`, optionally on the rayon pool.
///
/// Segments are concatenated in source-index order, so the output does not
/// depend on the worker count. The source cloud is not modified.
#[tracing::instrument(level = "debug", skip_all, fields(n = source.len()))]
pub fn split_points_with(
    source: &PointCloud,
    config: &CloudConfig,
    cancel: &CancellationToken,
) -> Result<Refinement> {
    if source.is_empty() {
        return Err(CloudError::EmptyInput("split_points"));
    }
    let graph = source.graph()?;
    let dim = source.dimension()?;
    let points = source.points();
    let n = source.len();

    let segment = |i: usize| -> Result<Segment> {
        cancel.check()?;
        Ok(refine_point(points, i, graph.neighbors(i)?))
    };

    let segments = if config.use_parallel(n) {
        (0..n).into_par_iter().map(segment).collect::<Result<Vec<_>>>()?
    } else {
        (0..n).map(segment).collect::<Result<Vec<_>>>()?
    };

    let total: usize = segments.iter().map(|s| s.coords.len()).sum();
    let mut data = Vec::with_capacity(total);
    let (mut pairs, mut triples) = (0, 0);
    for s in segments {
        data.extend_from_slice(&s.coords);
        pairs += s.pairs;
        triples += s.triples;
    }

    let cloud = PointCloud::from_flat(dim, data)?;
    debug!(pairs, triples, output = cloud.len(), "refinement complete");

    Ok(Refinement {
        cloud,
        pairs,
        triples,
    })
}
