//! Refine/Sparsify Cycles on a Noisy Circle
//!
//! Demonstrates the multi-scale loop on a sampled circle:
//!
//! 1. Sample a noisy circle and pick a threshold from k-NN distances
//! 2. Build the neighbor graph and report β₀ (connected components)
//! 3. Refine, then sparsify back to the same scale
//! 4. Repeat, watching point count and connectivity

use hypervolume_t::{
    sample, sparsify_points_with, split_points_with, CancellationToken, CloudConfig,
    SparsifyStrategy,
};

fn main() -> hypervolume_t::Result<()> {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  hypervolume-t: Refine / Sparsify Cycles");
    println!("═══════════════════════════════════════════════════════════════\n");

    // Sampling parameters
    let n_points = 200;
    let radius = 1.0;
    let noise = 0.05;
    let n_cycles = 4;

    println!("Sampling:");
    println!("  N = {} points", n_points);
    println!("  radius = {:.2}, noise = {:.3}", radius, noise);
    println!();

    let mut cloud = sample::noisy_circle(n_points, radius, noise, 2026)?;
    let config = CloudConfig {
        sparsify: SparsifyStrategy::FarthestPoint,
        ..CloudConfig::auto_configure(&cloud)?
    };
    let cancel = CancellationToken::new();

    println!("Auto-configured threshold ε = {:.4}\n", config.threshold);
    println!("{:>5} {:>8} {:>8} {:>6} {:>8} {:>8} {:>9}",
        "cycle", "points", "edges", "β₀", "pairs", "triples", "sparse");

    for cycle in 1..=n_cycles {
        cloud.find_neighbors_with(&config, &cancel)?;
        let graph = cloud.graph()?;
        let (points, edges, beta0) = (cloud.len(), graph.edge_count(), graph.component_count());

        let refined = split_points_with(&cloud, &config, &cancel)?;
        let sparse = sparsify_points_with(&refined.cloud, &config, &cancel)?;

        println!("{:>5} {:>8} {:>8} {:>6} {:>8} {:>8} {:>9}",
            cycle, points, edges, beta0, refined.pairs, refined.triples, sparse.cloud.len());

        cloud = sparse.cloud;
    }

    println!("\nFinal cloud: {} points", cloud.len());
    Ok(())
}
