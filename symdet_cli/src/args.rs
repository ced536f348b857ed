use std::path::PathBuf;

use clap::Parser;
use symdet_common::Config;

/// symdet - find mirror-symmetric devices and nets in analog netlists
#[derive(Parser, Debug)]
#[command(name = "symdet")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Netlist descriptions (JSON) to analyse
    #[arg(required = true)]
    pub netlists: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Skip self-symmetry completion
    #[arg(long, default_value_t = false)]
    pub no_self_symmetry: bool,
    /// Skip bias grouping and matching
    #[arg(long, default_value_t = false)]
    pub no_bias: bool,
    /// Do not pair passive devices
    #[arg(long, default_value_t = false)]
    pub no_passive_pairs: bool,
    /// Do not follow drains into second-stage input pairs
    #[arg(long, default_value_t = false)]
    pub no_gate_carry: bool,
}

impl Args {
    /// Convert command-line arguments into engine configuration
    pub fn to_config(&self) -> Config {
        Config::builder()
            .self_symmetry(!self.no_self_symmetry)
            .bias_matching(!self.no_bias)
            .passive_pairs(!self.no_passive_pairs)
            .gate_carry(!self.no_gate_carry)
            .build()
    }
}

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[value(name = "text")]
    Text,
    /// One JSON document per input
    #[value(name = "json")]
    Json,
}
