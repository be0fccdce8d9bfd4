//! I/O Module: Text Formats at the System Boundary
//!
//! - `points.rs`: whitespace/separator-delimited point files
//! - `csv.rs`: CSV export with an `x0,...,x{d-1}` header
//!
//! Export followed by load reproduces the coordinates exactly, since floats
//! are written with their shortest round-trip representation.

mod csv;
mod points;

pub use csv::{export_csv, write_csv};
pub use points::{load_points, read_points};
