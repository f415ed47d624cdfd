//! umlkit CLI - Inspect diagram types, sample diagrams and property bags

mod cli;
mod colorizer;
mod scenarios;

use clap::Parser;
use umlkit::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    // Environment variables take precedence over the logging flags
    let (level, format) = cli_args.log_settings();
    if let Err(e) = init_logging(Some(&level), Some(&format)) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let app = cli::UmlkitApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
