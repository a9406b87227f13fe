//! Interfaces between `aocheck` and its users and data sources.

use anyhow;

pub mod cli;
pub mod input;
pub mod trexio;

/// Trait for handling an input specification.
pub trait InputHandle {
    /// Handles the input section and runs appropriate calculations.
    fn handle(&self) -> Result<(), anyhow::Error>;
}
