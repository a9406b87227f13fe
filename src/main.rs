use std::process;

use anyhow;
use clap::Parser;

use aocheck::interfaces::cli::{init_logging, log_heading, Cli};
use aocheck::interfaces::InputHandle;

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging(cli.output.as_deref(), cli.diagnostic_level())?;
    log_heading();

    let input = cli.input()?;
    if input.handle().is_err() {
        process::exit(1);
    }
    Ok(())
}
