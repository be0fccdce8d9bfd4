//! hvt - command-line front end for point-cloud refinement
//!
//! Subcommands:
//! - `neighbors`: build the neighbor graph and print a summary
//! - `refine`: run refinement cycles and write the result as CSV
//! - `sparsify`: keep a threshold-separated subset and write it as CSV
//! - `suggest`: print the k-NN threshold estimate for a point file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hypervolume_t::{
    split_points_with, sparsify_points_with, suggested_threshold, CancellationToken, CloudConfig,
    PointCloud, SparsifyStrategy,
};

#[derive(Parser, Debug)]
#[command(name = "hvt")]
#[command(about = "Neighbor graphs, refinement and sparsification of point clouds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Run single-threaded
    #[arg(long, global = true)]
    sequential: bool,

    /// Clouds smaller than this run sequentially
    #[arg(long, global = true, default_value = "512")]
    min_parallel: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the neighbor graph and print a summary
    Neighbors(NeighborsArgs),
    /// Refine a cloud by inserting neighbor barycenters
    Refine(RefineArgs),
    /// Reduce a cloud to a threshold-separated subset
    Sparsify(SparsifyArgs),
    /// Suggest a threshold from k-th nearest neighbor distances
    Suggest(SuggestArgs),
}

#[derive(Args, Debug)]
struct NeighborsArgs {
    /// Input point file
    #[arg(short, long)]
    input: PathBuf,

    /// Neighbor threshold
    #[arg(short, long)]
    threshold: f64,
}

#[derive(Args, Debug)]
struct RefineArgs {
    /// Input point file
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long)]
    output: PathBuf,

    /// Neighbor threshold
    #[arg(short, long)]
    threshold: f64,

    /// Number of find_neighbors + refine cycles
    #[arg(long, default_value = "1")]
    iterations: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Greedy,
    Farthest,
}

impl From<Strategy> for SparsifyStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Greedy => SparsifyStrategy::Greedy,
            Strategy::Farthest => SparsifyStrategy::FarthestPoint,
        }
    }
}

#[derive(Args, Debug)]
struct SparsifyArgs {
    /// Input point file
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long)]
    output: PathBuf,

    /// Minimum separation of retained points
    #[arg(short, long)]
    threshold: f64,

    /// Selection strategy
    #[arg(long, value_enum, default_value = "greedy")]
    strategy: Strategy,
}

#[derive(Args, Debug)]
struct SuggestArgs {
    /// Input point file
    #[arg(short, long)]
    input: PathBuf,

    /// Which nearest neighbor to use
    #[arg(short, default_value = "5")]
    k: usize,
}

fn load(path: &PathBuf) -> Result<PointCloud> {
    let cloud = PointCloud::load(path).with_context(|| format!("Failed to load {:?}", path))?;
    info!(
        points = cloud.len(),
        dim = cloud.dimension().unwrap_or(0),
        "loaded {:?}",
        path
    );
    Ok(cloud)
}

fn run_neighbors(args: NeighborsArgs, base: CloudConfig) -> Result<()> {
    let mut cloud = load(&args.input)?;
    let config = CloudConfig {
        threshold: args.threshold,
        ..base
    };
    config.validate()?;
    cloud.find_neighbors_with(&config, &CancellationToken::new())?;

    let graph = cloud.graph()?;
    println!("points:      {}", cloud.len());
    println!("threshold:   {}", graph.threshold());
    println!("edges:       {}", graph.edge_count());
    println!("components:  {}", graph.component_count());
    println!("mean degree: {:.3}", graph.mean_degree());
    Ok(())
}

fn run_refine(args: RefineArgs, base: CloudConfig) -> Result<()> {
    let mut cloud = load(&args.input)?;
    let config = CloudConfig {
        threshold: args.threshold,
        ..base
    };
    config.validate()?;
    let cancel = CancellationToken::new();

    for cycle in 1..=args.iterations {
        cloud.find_neighbors_with(&config, &cancel)?;
        let refined = split_points_with(&cloud, &config, &cancel)
            .with_context(|| format!("Refinement cycle {} failed", cycle))?;
        info!(
            cycle,
            pairs = refined.pairs,
            triples = refined.triples,
            points = refined.cloud.len(),
            "refined"
        );
        cloud = refined.cloud;
    }

    cloud
        .export_csv(&args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    println!("Wrote {} points to {:?}", cloud.len(), args.output);
    Ok(())
}

fn run_sparsify(args: SparsifyArgs, base: CloudConfig) -> Result<()> {
    let cloud = load(&args.input)?;
    let config = CloudConfig {
        threshold: args.threshold,
        sparsify: args.strategy.into(),
        ..base
    };
    config.validate()?;

    let sparse = sparsify_points_with(&cloud, &config, &CancellationToken::new())?;
    sparse
        .cloud
        .export_csv(&args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    println!(
        "Kept {} of {} points ({} removed), wrote {:?}",
        sparse.retained.len(),
        cloud.len(),
        sparse.removed(),
        args.output
    );
    Ok(())
}

fn run_suggest(args: SuggestArgs) -> Result<()> {
    let cloud = load(&args.input)?;
    let threshold = suggested_threshold(&cloud, args.k)?;
    println!("{}", threshold);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let base = CloudConfig {
        parallel: !cli.sequential,
        parallel_min_points: cli.min_parallel,
        ..CloudConfig::default()
    };

    match cli.command {
        Commands::Neighbors(args) => run_neighbors(args, base),
        Commands::Refine(args) => run_refine(args, base),
        Commands::Sparsify(args) => run_sparsify(args, base),
        Commands::Suggest(args) => run_suggest(args),
    }
}
