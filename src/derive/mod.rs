//! Derive Module: New Clouds from Old
//!
//! Both derivations read a source cloud and return an independent cloud;
//! the source (and its neighbor graph) is never modified. Alternating them
//! with `find_neighbors` gives iterative refine/sparsify cycles across
//! scales.
//!
//! - `refine.rs`: insert barycenters of neighbor pairs and triples
//! - `sparsify.rs`: keep a T-separated, T-covering subset

mod refine;
mod sparsify;

pub use refine::{barycenter, split_points, split_points_with, Refinement};
pub use sparsify::{
    sparsify_points, sparsify_points_with, Sparsification, SparsifyStrategy,
};
