//! Numerical evaluation of atomic-orbital overlap matrices on integration grids.
//!
//! Two interchangeable strategies are provided behind the [`AoEvaluator`] trait:
//!
//! - [`BatchAoEvaluator`] evaluates all atomic orbitals on the whole point cloud at once through
//! a [`BatchAoKernel`] and forms the overlap matrix with a single matrix product;
//! - [`PointwiseAoEvaluator`] visits the grid points one at a time and accumulates outer products,
//! avoiding the large intermediate value matrix.

use std::fmt;

use anyhow;
use clap::ValueEnum;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::grid::IntegrationGrid;
use crate::interfaces::trexio::{TrexioAoBasis, TrexioSource};

mod batch;
mod pointwise;

pub use batch::{BatchAoEvaluator, BatchAoKernel};
pub use pointwise::PointwiseAoEvaluator;


// ================
// Enum definitions
// ================

/// An enumerated type for the available atomic-orbital evaluation strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum AoEvaluatorKind {
    /// Whole-grid evaluation followed by a single matrix product.
    Batch,

    /// Point-by-point evaluation with incremental accumulation.
    Pointwise,
}

impl Default for AoEvaluatorKind {
    fn default() -> Self {
        AoEvaluatorKind::Batch
    }
}

impl fmt::Display for AoEvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AoEvaluatorKind::Batch => write!(f, "batch"),
            AoEvaluatorKind::Pointwise => write!(f, "pointwise"),
        }
    }
}

// =================
// Trait definitions
// =================

/// Trait for strategies computing the atomic-orbital overlap matrix by quadrature.
pub trait AoEvaluator {
    /// The kind of this evaluator.
    fn kind(&self) -> AoEvaluatorKind;

    /// The number of atomic orbitals this evaluator produces values for.
    fn ao_num(&self) -> usize;

    /// Computes the overlap matrix
    /// $`S_{ij} \approx \sum_{\mathbf{r}} \chi_i(\mathbf{r}) \chi_j(\mathbf{r})\, \Delta V`$
    /// over all points of `grid`, where $`\Delta V`$ is the voxel volume of the grid.
    ///
    /// # Returns
    ///
    /// A symmetric array of shape $`(N_{\mathrm{AO}}, N_{\mathrm{AO}})`$.
    fn overlap(&mut self, grid: &IntegrationGrid) -> Result<Array2<f64>, anyhow::Error>;
}

/// Constructs the evaluator of the requested kind.
///
/// The batch evaluator initialises its kernel from `source` itself, so that the kernel state
/// matches the data being validated. The pointwise evaluator builds its basis set from
/// `ao_basis`.
///
/// # Errors
///
/// Errors if the basis set cannot be built, in particular if it is not of Gaussian type.
pub fn build_evaluator(
    kind: AoEvaluatorKind,
    ao_basis: &TrexioAoBasis,
    source: &dyn TrexioSource,
) -> Result<Box<dyn AoEvaluator>, anyhow::Error> {
    match kind {
        AoEvaluatorKind::Batch => Ok(Box::new(BatchAoEvaluator::new(source)?)),
        AoEvaluatorKind::Pointwise => Ok(Box::new(PointwiseAoEvaluator::new(ao_basis)?)),
    }
}
