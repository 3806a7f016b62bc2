use anyhow::{Context, Result};
use clap::Parser;
use gapedit::Config;
use gapedit_bin::{
    cli::{Cli, Command},
    commands,
};
use gapedit_log::LogConfig;
use std::io;

fn main() {
    let cli = Cli::parse();

    let _log_guard = match gapedit_log::init(LogConfig {
        log_file_path: cli.log_file.clone(),
    }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e}");
            None
        },
    };

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let discovered = Config::discover(&cwd);
    let config = Config::load_with_overrides(cli.config.as_deref(), discovered.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Info(args) => commands::info::handle(args, &config, &mut out),
        Command::Run(args) => commands::run::handle(args, &config, &mut out),
    }
}
