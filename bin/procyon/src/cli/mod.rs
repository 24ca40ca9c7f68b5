pub mod node;
pub mod verbosity;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    node::NodeConfig,
    verbosity::{DEFAULT_VERBOSITY, Verbosity, verbosity_parser},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level, 0 (off) to 5 (trace). RUST_LOG takes precedence when set.
    #[arg(short, long, global = true, default_value = DEFAULT_VERBOSITY, value_parser = verbosity_parser)]
    pub verbosity: Verbosity,

    #[arg(
        long,
        global = true,
        help = "The directory for storing application data. If used together with --ephemeral, the given directory is used."
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(
        long,
        short,
        global = true,
        help = "Use new data directory, located in OS temporary directory."
    )]
    pub ephemeral: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the node
    #[command(name = "node")]
    Node(Box<NodeConfig>),
}
