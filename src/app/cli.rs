use crate::app::config::DEFAULT_OUTPUT_FILE;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate a single-file repository context for LLM prompts"
)]
pub struct Cli {
    /// Path to the repository
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Path to a JSON configuration file (`.toml` files are read as TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print to stdout instead of saving to a file
    #[arg(long)]
    pub no_save: bool,

    /// Show only the directory tree structure
    #[arg(long)]
    pub tree: bool,

    /// Maximum directory depth to traverse
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Files larger than this many KB are noted instead of embedded
    #[arg(long)]
    pub max_file_size_kb: Option<u64>,

    /// Include hidden files and directories
    #[arg(long)]
    pub include_hidden: bool,

    /// Do not apply the repository's root .gitignore
    #[arg(long)]
    pub no_gitignore: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
