use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Embed a directory of files into a generated Rust module"
)]
pub struct Cli {
    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Directories with files to embed (default: ./include)
    #[arg(short = 'p', long = "path", num_args = 1..)]
    pub paths: Option<Vec<PathBuf>>,

    /// Output file, or '-' for stdout
    #[arg(short, long, default_value = "files.rs")]
    pub out: String,

    /// Wrap the generated items in `pub mod <MODULE>`
    #[arg(long)]
    pub module: Option<String>,

    /// Name of the generated static table
    #[arg(short, long, default_value = "FILES")]
    pub map: String,

    /// Retain directory paths in keys (dirname/filename instead of filename)
    #[arg(short, long)]
    pub keep_dirs: bool,

    /// Patterns that a file must all match to be embedded
    #[arg(short, long, num_args = 1..)]
    pub include: Option<Vec<String>>,

    /// Patterns for files to skip; a value may be a list like "a | b | c"
    #[arg(short = 'x', long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,

    /// Rename files in the output: FROM=TO, where TO may contain a directory
    #[arg(short, long, num_args = 1..)]
    pub alias: Option<Vec<String>>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
