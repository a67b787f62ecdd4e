mod app;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = app::Cli::parse();

    let default_filter = if cli.verbose {
        "metalens=debug"
    } else {
        "metalens=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(message) = app::run(&cli) {
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}
