//! symdet CLI
//!
//! Loads one or more flattened analog netlists, runs symmetry detection on
//! each and prints the resulting groups, symmetric nets and bias matches.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;
mod load;

use std::path::Path;

use clap::Parser;
use rayon::prelude::*;
use symdet_common::Config;
use symdet_engine::{SymmetryEngine, SymmetryReport};
use tracing::{error, info};

use args::{Args, OutputFormat};
use load::{LoadError, load_netlist};

/// Loads and analyses one file.
fn analyse(path: &Path, config: &Config) -> Result<SymmetryReport, LoadError> {
    let netlist = load_netlist(path)?;
    let engine = SymmetryEngine::with_config(&netlist, config.clone());
    Ok(engine.report())
}

/// Executes symmetry detection.
///
/// This function:
/// 1. Initializes logging
/// 2. Parses command-line arguments
/// 3. Analyses every input in parallel
/// 4. Prints reports in input order
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let config = args.to_config();
    info!("Analysing {} netlists", args.netlists.len());

    let results = args
        .netlists
        .par_iter()
        .map(|path| (path, analyse(path, &config)))
        .collect::<Vec<_>>();

    let mut failures = 0usize;
    for (path, result) in results {
        match result {
            Ok(report) => match args.format {
                OutputFormat::Text => {
                    println!("=== {} ===", path.display());
                    print!("{report}");
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            },
            Err(err) => {
                error!("{err}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} netlists failed", args.netlists.len()).into());
    }
    Ok(())
}
