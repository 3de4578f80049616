use std::path::PathBuf;

use geoimport::{Format, LayerId};

/// Geographic data import CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "geoimport", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Import a file into a map session and write the session back out
    Import(ImportArgs),

    /// Parse a file and summarize what an import would bring in
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Input data file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Input format, guessed from the extension when omitted
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Existing session (.umap) to import into, defaults to an empty map
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub session: Option<PathBuf>,

    /// Target layer id; a new layer is created when omitted
    #[arg(short, long)]
    pub layer: Option<LayerId>,

    /// Replace the target layer's features instead of appending
    #[arg(long, requires = "layer")]
    pub replace: bool,

    /// Name of the new layer
    #[arg(short, long, conflicts_with = "layer")]
    pub name: Option<String>,

    /// Import configuration (JSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output session file, defaults to "./map.umap"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Input data file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Input format, guessed from the extension when omitted
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Import configuration (JSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}
