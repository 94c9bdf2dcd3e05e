//! Trinity CLI entry point.

use clap::Parser;

use trinity::cli::{commands, handle_error, Cli, Commands};
use trinity::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.global.json;

    let config = match cli.global.load_config() {
        Ok(config) => config,
        Err(err) => handle_error(err, json),
    };
    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, json),
    };

    let global = &cli.global;
    let result = match cli.command {
        Commands::RepoKey(args) => commands::repo_key::execute(args, json),
        Commands::Verify(args) => commands::verify::execute(args, global, &config).await,
        Commands::Generate(args) => commands::generate::execute(args, global, &config).await,
        Commands::History(args) => commands::history::execute(args, global, &config).await,
        Commands::Run(args) => commands::run::execute(args, global, &config).await,
    };

    if let Err(err) = result {
        handle_error(err, json);
    }
}
