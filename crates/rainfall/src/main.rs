#![forbid(unsafe_code)]

//! Rainfall binary entry point.

use rainfall::{app, cli, logging};

fn main() {
    let opts = cli::Opts::parse();

    if let Err(e) = opts.rain_config().validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    if let Some(path) = logging::init_from_env() {
        tracing::info!(path = %path.display(), "logging to file");
    }

    if let Err(e) = app::run(&opts) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
