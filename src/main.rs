use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use vrpd_routes::reconstruct::{ReconstructOptions, reconstruct, reconstruct_parallel};
use vrpd_routes::render::{SvgRenderer, save_svg};
use vrpd_routes::report::{write_graph_json, write_report, write_routes};
use vrpd_routes::{Instance, Solution};

#[derive(Parser)]
#[clap(author, version, about = "Rebuild truck and drone routes of a VRPD solution", long_about = None)]
struct Cli {
    /// Instance file
    instance: PathBuf,

    /// Solution file: `client vehicle T|D` per line, or a JSON tuple list
    solution: PathBuf,

    /// Write the route diagram as VRPDSolution.svg
    #[arg(short, long)]
    save: bool,

    /// Directory the diagram is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the reconstructed graph as JSON instead of edge lists
    #[arg(long)]
    json: bool,

    /// Rebuild vehicles in parallel
    #[arg(long)]
    parallel: bool,

    /// Return drones left away from their truck to the depot
    #[arg(long)]
    close_stranded_drones: bool,

    /// Print the instance summary before the report
    #[arg(long)]
    summary: bool,

    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    let instance = Instance::from_file(&cli.instance)
        .with_context(|| format!("loading instance {}", cli.instance.display()))?;
    let solution = Solution::from_file(&cli.solution)
        .with_context(|| format!("loading solution {}", cli.solution.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.summary {
        write!(out, "{}", instance)?;
    }
    write_report(&solution, &mut out)?;

    let options = ReconstructOptions {
        close_stranded_drones: cli.close_stranded_drones,
    };
    let graph = if cli.parallel {
        reconstruct_parallel(&instance, &solution, &options)
    } else {
        reconstruct(&instance, &solution, &options)
    }
    .context("reconstructing routes")?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "routes rebuilt"
    );

    if cli.json {
        write_graph_json(&graph, &mut out)?;
    } else {
        write_routes(&graph, &mut out)?;
    }

    if cli.save {
        let path = save_svg(&graph, &SvgRenderer::default(), &cli.output_dir)?;
        writeln!(out, "Image has been saved successfully -- Image fileName: {}", path.display())?;
    }

    Ok(())
}
