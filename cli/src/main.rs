mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{prepare_rivers, render, shell};
#[cfg(feature = "download")]
use commands::fetch;

/// Log to stderr; `RUST_LOG` wins over the `-v` count.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::PrepareRivers(args) => prepare_rivers::run(&cli, args),
        Commands::Render(args) => render::run(&cli, args),
        Commands::Shell(args) => shell::run(&cli, args),
        #[cfg(feature = "download")]
        Commands::Fetch(args) => fetch::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
