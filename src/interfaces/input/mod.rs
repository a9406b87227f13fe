//! YAML input files for `aocheck`.

use std::path::PathBuf;

use anyhow::{self, format_err};
use serde::{Deserialize, Serialize};

use crate::drivers::overlap_check::{OverlapCheckDriver, OverlapCheckParams};
use crate::drivers::AoCheckDriver;
use crate::interfaces::trexio::open_trexio;
use crate::interfaces::InputHandle;
use crate::io::format::aocheck_error;

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;

/// A structure containing `aocheck` input parameters which can be serialised into and
/// deserialised from a YAML input file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Input {
    /// The TREXIO file to be checked. This can be overridden on the command line.
    ///
    /// If not specified, this will be taken to be `None`, and a file must be given on the
    /// command line.
    #[serde(default)]
    pub trexio_file: Option<PathBuf>,

    /// Parameters for the overlap check.
    ///
    /// If not specified, the default parameters are used.
    #[serde(default)]
    pub overlap_check: OverlapCheckParams,
}

impl InputHandle for Input {
    /// Runs the overlap check on the specified TREXIO file. Any error is also logged to both the
    /// default and the `aocheck-output` loggers before being returned.
    fn handle(&self) -> Result<(), anyhow::Error> {
        self.run_overlap_check().map_err(|err| {
            aocheck_error!("{err:#}");
            err
        })
    }
}

impl Input {
    fn run_overlap_check(&self) -> Result<(), anyhow::Error> {
        let path = self
            .trexio_file
            .as_ref()
            .ok_or_else(|| format_err!("No TREXIO file specified."))?;
        let source = open_trexio(path)?;
        let mut driver = OverlapCheckDriver::builder()
            .parameters(&self.overlap_check)
            .source(source.as_ref())
            .build()
            .map_err(|err| format_err!(err))?;
        driver.run()
    }
}
