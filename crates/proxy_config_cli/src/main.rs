use std::process;

use clap::Parser;
use proxy_config_cli::commands::{self, Commands};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// proxy-config: Resolve layered proxy workload configuration
#[derive(Parser)]
#[command(name = "proxy-config")]
#[command(about = "Resolve layered proxy workload configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    // Logs go to stderr so that stdout only carries the rendered document
    tracing_subscriber::registry()
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("PROXY_CONFIG_LOG"))
        .init();

    let cli = Cli::parse();
    match commands::execute(&cli.command) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
