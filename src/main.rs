//! VeriFact CLI entry point.

use clap::Parser;

use verifact::cli::{dispatch, handle_error, Cli};
use verifact::{ConfigLoader, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Keep the guard alive so file logs flush on exit
    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    if let Err(err) = dispatch(cli.command, config, cli.json).await {
        handle_error(err, cli.json);
    }
}
