//! Synthetic point clouds for demos, tests and benchmarks.
//!
//! All generators are seeded so runs are reproducible.

use std::f64::consts::PI;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::cloud::PointCloud;
use crate::error::{CloudError, Result};

fn normal(name: &'static str, sigma: f64) -> Result<Normal<f64>> {
    // Normal::new accepts negative std devs
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(CloudError::InvalidParameter { name, value: sigma });
    }
    Normal::new(0.0, sigma).map_err(|_| CloudError::InvalidParameter { name, value: sigma })
}

fn check_dim(dim: usize) -> Result<()> {
    if dim == 0 {
        return Err(CloudError::InvalidParameter {
            name: "dim",
            value: 0.0,
        });
    }
    Ok(())
}

/// Points on a circle of `radius` with Gaussian jitter of std `noise`
pub fn noisy_circle(n: usize, radius: f64, noise: f64, seed: u64) -> Result<PointCloud> {
    let mut rng = StdRng::seed_from_u64(seed);
    let jitter = normal("noise", noise)?;
    let angle = Uniform::new(0.0, 2.0 * PI).map_err(|_| CloudError::InvalidParameter {
        name: "angle",
        value: 2.0 * PI,
    })?;

    let mut points = Array2::zeros((n, 2));
    for i in 0..n {
        let theta = angle.sample(&mut rng);
        points[[i, 0]] = radius * theta.cos() + jitter.sample(&mut rng);
        points[[i, 1]] = radius * theta.sin() + jitter.sample(&mut rng);
    }

    PointCloud::from_array(points)
}

/// Uniform samples in the cube [0, side)^dim
pub fn uniform_box(n: usize, dim: usize, side: f64, seed: u64) -> Result<PointCloud> {
    check_dim(dim)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let uniform = Uniform::new(0.0, side).map_err(|_| CloudError::InvalidParameter {
        name: "side",
        value: side,
    })?;

    let points = Array2::from_shape_fn((n, dim), |_| uniform.sample(&mut rng));
    PointCloud::from_array(points)
}

/// Isotropic Gaussian blob centered at the origin
pub fn gaussian_blob(n: usize, dim: usize, sigma: f64, seed: u64) -> Result<PointCloud> {
    check_dim(dim)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = normal("sigma", sigma)?;

    let points = Array2::from_shape_fn((n, dim), |_| normal.sample(&mut rng));
    PointCloud::from_array(points)
}
