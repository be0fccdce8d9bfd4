//! # hypervolume-t
//!
//! Proximity Structures and Refined Point Sets for Multi-Scale
//! Topological Data Analysis
//!
//! This crate builds the inputs that a persistent-homology or
//! hypervolume-estimation engine consumes: epsilon-neighborhood graphs
//! over point clouds in ℝᵈ, and point clouds refined or sparsified at a
//! chosen scale.
//!
//! ## Pipeline
//!
//! 1. **Populate** a [`PointCloud`] from a text file or programmatically
//!
//! 2. **Neighbor graph**: for a threshold ε, record every pair with
//!    d(xᵢ, xⱼ) ≤ ε. Lists are stored upper-triangular (j > i), which
//!    halves the O(n²·d) distance work.
//!
//! 3. **Refine**: insert barycenters of neighbor pairs and triples around
//!    every point, approximating interiors of Rips edges and triangles
//!
//! 4. **Sparsify**: keep an ε-separated subset that still covers the
//!    cloud within ε
//!
//! Steps 2-4 can be repeated to move across scales.
//!
//! ## Example
//!
//! ```
//! use hypervolume_t::{split_points, PointCloud};
//!
//! let mut cloud = PointCloud::from_rows(vec![
//!     vec![0.0, 0.0],
//!     vec![1.0, 0.0],
//!     vec![0.0, 1.0],
//! ])?;
//! cloud.find_neighbors(1.5)?;
//!
//! let refined = split_points(&cloud)?;
//! assert_eq!(refined.cloud.len(), 7);
//! assert_eq!((refined.pairs, refined.triples), (3, 1));
//! # Ok::<(), hypervolume_t::CloudError>(())
//! ```

pub mod cloud;
pub mod config;
pub mod derive;
pub mod error;
pub mod io;
pub mod sample;

// Re-exports from cloud
pub use cloud::{
    euclidean,
    CancellationToken,
    NeighborEntry,
    NeighborGraph,
    PointCloud,
};

// Re-exports from derive
pub use derive::{
    barycenter,
    // Refinement
    split_points,
    split_points_with,
    Refinement,
    // Sparsification
    sparsify_points,
    sparsify_points_with,
    Sparsification,
    SparsifyStrategy,
};

pub use config::{suggested_threshold, CloudConfig};
pub use error::{CloudError, Result};
pub use io::{export_csv, load_points, read_points, write_csv};
