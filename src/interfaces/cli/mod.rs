use std::path::{Path, PathBuf};

use anyhow::{self, bail, Context};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::append::Append;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::evaluator::AoEvaluatorKind;
use crate::interfaces::input::Input;
use crate::io::format::aocheck_output;
use crate::io::read_aocheck_yaml;

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs a nicely formatted `aocheck` heading to the `aocheck-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    aocheck_output!("╭─────────────────────────────────────────────────────────────────────────────╮");
    aocheck_output!("│                                                                             │");
    aocheck_output!("│                     ▄▀█ █▀█ █▀▀ █░█ █▀▀ █▀▀ █▄▀                             │");
    aocheck_output!("│                     █▀█ █▄█ █▄▄ █▀█ ██▄ █▄▄ █░█                             │");
    aocheck_output!("│                                                                             │");
    aocheck_output!("│          Numerical checks of atomic-orbital overlap integrals               │");
    aocheck_output!("│                                                               {version:>13} │");
    aocheck_output!("╰─────────────────────────────────────────────────────────────────────────────╯");
    aocheck_output!("");
}

/// Command-line interface of `aocheck`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The TREXIO file to be checked (`.yml`/`.yaml`, or `.h5`/`.hdf5` when built with the
    /// `trexio-hdf5` feature). Overrides the file given in the configuration file.
    pub trexio_file: Option<PathBuf>,

    /// The number of grid points along each Cartesian axis.
    #[arg(short = 'n', long)]
    pub grid_resolution: Option<usize>,

    /// The atomic-orbital evaluation strategy.
    #[arg(short, long, value_enum)]
    pub evaluator: Option<AoEvaluatorKind>,

    /// Only write the summary, not the values of every atomic-orbital pair.
    #[arg(short, long)]
    pub summary_only: bool,

    /// Optional name for saving the overlap-check result as a binary file.
    #[arg(long)]
    pub save: Option<String>,

    /// A YAML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// A file to write the output to instead of the standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Increases the verbosity of diagnostics on the standard error. May be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds the input specification from the configuration file, if any, with command-line
    /// options taking precedence.
    pub fn input(&self) -> Result<Input, anyhow::Error> {
        let mut input = if let Some(config) = self.config.as_ref() {
            read_aocheck_yaml::<Input, _>(config).with_context(|| {
                format!(
                    "Unable to read the configuration file `{}`",
                    config.display()
                )
            })?
        } else {
            Input::default()
        };
        if let Some(trexio_file) = self.trexio_file.as_ref() {
            input.trexio_file = Some(trexio_file.clone());
        }
        if input.trexio_file.is_none() {
            bail!("No TREXIO file specified on the command line or in the configuration file.");
        }
        let params = &mut input.overlap_check;
        if let Some(n) = self.grid_resolution {
            params.grid_resolution = n;
        }
        if let Some(evaluator) = self.evaluator {
            params.evaluator = evaluator;
        }
        if self.summary_only {
            params.write_pairs = false;
        }
        if let Some(name) = self.save.as_ref() {
            params.result_save_name = Some(name.clone());
        }
        if params.grid_resolution < 2 {
            bail!(
                "At least 2 grid points per axis are required, but {} requested.",
                params.grid_resolution
            );
        }
        Ok(input)
    }

    /// The level of diagnostics written to the standard error.
    pub fn diagnostic_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Sets up logging. Records to the `aocheck-output` target are written without decoration to
/// `output`, or to the standard output if `output` is `None`. All other records at or above
/// `level` are written to the standard error.
pub fn init_logging(output: Option<&Path>, level: LevelFilter) -> Result<(), anyhow::Error> {
    let output_encoder = Box::new(PatternEncoder::new("{m}{n}"));
    let output_appender: Box<dyn Append> = if let Some(path) = output {
        Box::new(
            FileAppender::builder()
                .encoder(output_encoder)
                .append(false)
                .build(path)?,
        )
    } else {
        Box::new(
            ConsoleAppender::builder()
                .encoder(output_encoder)
                .target(Target::Stdout)
                .build(),
        )
    };
    let diagnostics_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("[{l:<5}] {t} - {m}{n}")))
        .target(Target::Stderr)
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("output", output_appender))
        .appender(Appender::builder().build("diagnostics", Box::new(diagnostics_appender)))
        .logger(
            Logger::builder()
                .appender("output")
                .additive(false)
                .build("aocheck-output", LevelFilter::Info),
        )
        .build(Root::builder().appender("diagnostics").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}
