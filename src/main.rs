//! polyconf - multi-format configuration tool
//!
//! Binary entry point: sets up logging from the environment and hands the
//! parsed command line to the CLI executor.

use clap::Parser;
use polyconf::{
    cli::{run_cli, PolyconfCli},
    logging::{init_logging, LogConfig, LogLevel},
    Result,
};

fn main() -> Result<()> {
    let cli = PolyconfCli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.at_least(LogLevel::Debug);
    }
    init_logging(&log_config)?;

    run_cli(cli)
}
