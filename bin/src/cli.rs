use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gapedit", version, about = "Edit files by replaying cursor command scripts")]
pub struct Cli {
    /// Config file to use instead of a discovered `gapedit.toml`
    #[arg(long, global = true, env = "GAPEDIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path, or a directory to put the log file in
    #[arg(long, global = true, env = "GAPEDIT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print size, line count and kind of a file
    Info(InfoArgs),

    /// Load a file and run a command script against it
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// File to edit
    pub path: PathBuf,

    /// Script with one command per line
    #[arg(short, long)]
    pub script: PathBuf,

    /// Save the result back to the file
    #[arg(short, long)]
    pub write: bool,

    /// Print the resulting text to stdout
    #[arg(short, long)]
    pub print: bool,
}
