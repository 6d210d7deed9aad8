use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nbdoc_core::{DocStyle, Language, Tone};

/// Generate documentation for Jupyter notebooks through a documentation service.
#[derive(Debug, Parser)]
#[command(name = "nbdoc", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit notebooks and show the generated documentation
    Generate(GenerateArgs),
    /// Write a configuration file with default values
    InitConfig {
        /// Destination, defaults to ./nbdoc.ron
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Notebook files; anything without an .ipynb extension is skipped
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Drop the selected notebook at this position (0-based) before submitting
    #[arg(long = "remove", value_name = "INDEX")]
    pub remove: Vec<usize>,

    #[arg(long)]
    pub language: Option<Language>,

    /// Documentation style: concise or explanatory
    #[arg(long = "style", value_name = "STYLE")]
    pub doc_style: Option<DocStyle>,

    /// Tone: professional, creative or casual
    #[arg(long)]
    pub tone: Option<Tone>,

    /// Base URL of the documentation service
    #[arg(long = "server", value_name = "URL", env = "NBDOC_SERVER")]
    pub server_url: Option<String>,

    /// Download the exported PDF after generation
    #[arg(long)]
    pub export: bool,

    /// Copy the raw response text to a file, or `-` for stdout
    #[arg(long = "copy-raw", value_name = "PATH")]
    pub copy_raw: Option<PathBuf>,

    /// Also write the rendered documentation as an HTML page
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Directory for exported artifacts
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Show the response with markdown markers stripped instead of rendered
    #[arg(long)]
    pub legacy_render: bool,

    #[arg(long)]
    pub no_color: bool,

    /// Configuration file, defaults to ./nbdoc.ron
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging, mirrored to the terminal
    #[arg(short, long)]
    pub verbose: bool,
}
