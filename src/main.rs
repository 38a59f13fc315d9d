use clap::Parser;
use toll_booth::{app, common::logger, config::CliConfig};

fn main() {
    let config = CliConfig::parse();
    logger::init_cli_logger(config.verbose);
    tracing::debug!(?config, "starting toll booth");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = app::run(&config, stdin.lock(), stdout.lock()) {
        tracing::error!(%e, "session ended with an error");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
