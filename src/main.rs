mod app;
mod cli;
mod config;
mod consts;
mod error;
mod estimate;
mod model;
mod output;
mod parse;
mod resample;

use clap::Parser;

use cli::Cli;
use config::Config;

/// The returned handle must stay alive for the process lifetime; dropping it
/// shuts the logger down.
fn init_logging(level: &str) -> Option<flexi_logger::LoggerHandle> {
    match flexi_logger::Logger::try_with_str(level) {
        Ok(logger) => match logger.log_to_stderr().start() {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("Warning: failed to start logger: {e}");
                None
            }
        },
        Err(e) => {
            eprintln!("Warning: invalid log level {level:?}: {e}");
            None
        }
    }
}

fn main() {
    let cli = Cli::parse().with_config(&Config::load());
    let _logger = init_logging(cli.log_level.as_deref().unwrap_or("warn"));

    if let Err(e) = app::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
