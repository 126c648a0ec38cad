//! boxbuild CLI - reproducible machine-image builds on top of Packer

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use boxbuild::core::error::exit_code_for;
use boxbuild::util::{Interrupt, Shell};
use cli::{Cli, Commands};

fn main() {
    match run() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("boxbuild=debug")
    } else {
        EnvFilter::new("boxbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    let interrupt = Interrupt::new();
    interrupt.install()?;

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &shell, &interrupt),
        Commands::Normalize(args) => commands::normalize::execute(args, &shell, &interrupt),
        Commands::List(args) => commands::list::execute(args, &shell),
    }
}
