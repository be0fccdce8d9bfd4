//! Cloud Module: Point Storage and Neighborhood Graphs
//!
//! A point cloud X = {x₀, ..., x_{n-1}} ⊂ ℝᵈ is kept as an arena of points
//! addressed by integer index. Once a scale ε is chosen, the neighbor graph
//! records every pair {i, j} with d(xᵢ, xⱼ) ≤ ε, which is the edge set of
//! the Vietoris-Rips complex VR_ε(X).
//!
//! - `point_cloud.rs`: the store and its query surface
//! - `metric.rs`: Euclidean distance
//! - `graph.rs`: triangular neighbor lists and their builder
//! - `cancel.rs`: cooperative cancellation for the quadratic passes

mod cancel;
mod graph;
pub(crate) mod metric;
mod point_cloud;

pub use cancel::CancellationToken;
pub use graph::{NeighborEntry, NeighborGraph};
pub use metric::euclidean;
pub use point_cloud::PointCloud;
