//! GeoNear CLI - augment delimited point tables with geodesic distance and
//! nearest-neighbor columns.
//!
//! This binary is a thin shell over the `geonear` library: it parses
//! arguments, bootstraps logging, loads the input table, applies each
//! requested augmentation in order, and writes the result.

mod error;
mod requests;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use geonear::augment;
use geonear::table::{self, Table};

use crate::error::CliError;
use crate::requests::{DistanceRequest, NeighborRequest};

#[derive(Parser)]
#[command(name = "geonear")]
#[command(version = geonear::VERSION)]
#[command(
    about = "Calculate geodesic distances between points and sets",
    long_about = None
)]
struct Args {
    /// Input table (.csv is comma separated, anything else tab separated)
    filename: PathBuf,

    /// Output file path (.raw, .tsv or .csv)
    #[arg(short, long)]
    output: PathBuf,

    /// Append a distance-to-point column: NAME,LAT,LON (repeatable)
    #[arg(short = 'd', long = "distance", value_name = "NAME,LAT,LON")]
    distance: Vec<String>,

    /// Append nearest-neighbor columns from FILE: ID_NAME,DIST_NAME,FILE (repeatable)
    #[arg(
        short = 'n',
        long = "neighbor",
        visible_alias = "neighbour",
        value_name = "ID_NAME,DIST_NAME,FILE"
    )]
    neighbor: Vec<String>,

    /// Increase output verbosity
    #[arg(long)]
    verbose: bool,

    /// Report total wall-clock time on completion
    #[arg(long)]
    timeit: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let start = Instant::now();
    if let Err(e) = run(&args) {
        e.exit();
    }
    if args.timeit {
        println!("--- {:7.3} seconds ---", start.elapsed().as_secs_f64());
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    tracing::info!("validating input");
    if !args.filename.exists() {
        return Err(CliError::InputNotFound(args.filename.clone()));
    }
    table::ensure_output_extension(&args.output)?;

    let distances: Vec<DistanceRequest> = args
        .distance
        .iter()
        .map(|raw| requests::parse_distance(raw))
        .collect::<Result<_, _>>()
        .map_err(CliError::InvalidRequest)?;
    let neighbors: Vec<NeighborRequest> = args
        .neighbor
        .iter()
        .map(|raw| requests::parse_neighbor(raw))
        .collect::<Result<_, _>>()
        .map_err(CliError::InvalidRequest)?;

    let mut table = Table::from_path(&args.filename)?;
    tracing::info!(
        input = %args.filename.display(),
        columns = ?table.header(),
        rows = table.len(),
        "loaded input"
    );

    for request in &distances {
        tracing::info!(
            column = %request.column,
            lat = request.latitude,
            lon = request.longitude,
            "computing distance to point"
        );
        augment::append_distance_column(
            &mut table,
            request.latitude,
            request.longitude,
            &request.column,
        )?;
    }

    for request in &neighbors {
        tracing::info!(
            reference = %request.filename.display(),
            id_column = %request.id_column,
            dist_column = %request.dist_column,
            "computing nearest neighbors"
        );
        let reference = Table::from_path(&request.filename)?;
        augment::append_neighbor_columns(
            &mut table,
            &reference,
            &request.id_column,
            &request.dist_column,
        )?;
    }

    tracing::info!(output = %args.output.display(), "saving output");
    table.write_to_path(&args.output)?;
    Ok(())
}

/// Set up console logging on stderr.
///
/// `--verbose` turns on per-step detail and scan progress; an explicit
/// `RUST_LOG` still takes precedence.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "geonear=debug,info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
