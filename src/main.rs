use clap::Parser;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use weekload::cli;
use weekload::cli::commands::{Cli, Commands};

fn main() {
    // Tracing is opt-in via RUST_LOG; default is silent.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let exit_code = match cli_args.command {
        Commands::Init { role } => cli::init::run(&role, json_output),
        Commands::Resource(cmd) => cli::resource::run(cmd, json_output),
        Commands::Client(cmd) => cli::client::run(cmd, json_output),
        Commands::Task(cmd) => cli::task::run(cmd, json_output),
        Commands::Week(cmd) => cli::week::run(cmd, json_output),
        Commands::Annual(cmd) => cli::annual::run(cmd, json_output),
        Commands::Board { week, year } => cli::board::run(week, year, json_output),
    };

    process::exit(exit_code);
}
