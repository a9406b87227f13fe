//! Whole-grid evaluation of atomic orbitals.

use anyhow::{self, ensure, format_err, Context};
use ndarray::Array2;

use crate::basis::gaussian::BasisSet;
use crate::evaluator::{AoEvaluator, AoEvaluatorKind};
use crate::grid::IntegrationGrid;
use crate::interfaces::trexio::{TrexioAoBasis, TrexioSource};

// -------------
// BatchAoKernel
// -------------

/// A stateful kernel context evaluating all atomic orbitals of a data source on a set of points.
///
/// The context is used in three steps: [`Self::load`] reads the basis from a data source,
/// [`Self::set_points`] fixes the evaluation points, and [`Self::ao_values`] returns the values
/// of all atomic orbitals at those points.
#[derive(Clone, Debug, Default)]
pub struct BatchAoKernel {
    /// The basis set loaded from the data source.
    basis_set: Option<BasisSet>,

    /// The evaluation points, of shape $`(N_{\mathrm{points}}, 3)`$.
    points: Option<Array2<f64>>,
}

impl BatchAoKernel {
    /// Creates an empty kernel context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the nuclei and the atomic-orbital basis from a data source.
    ///
    /// # Errors
    ///
    /// Errors if the data source cannot be read or if its basis cannot be evaluated.
    pub fn load(&mut self, source: &dyn TrexioSource) -> Result<&mut Self, anyhow::Error> {
        let ao_basis = TrexioAoBasis::read(source)?;
        let basis_set = BasisSet::from_trexio(&ao_basis).with_context(|| {
            format!(
                "Unable to load the atomic-orbital basis of `{}` into the batch kernel",
                source.name()
            )
        })?;
        ensure!(
            basis_set.n_funcs() == ao_basis.ao_num(),
            "The basis set has {} functions but `ao.num` is {}.",
            basis_set.n_funcs(),
            ao_basis.ao_num()
        );
        self.basis_set = Some(basis_set);
        Ok(self)
    }

    /// Sets the evaluation points.
    ///
    /// # Arguments
    ///
    /// * `points` - An array of shape $`(N_{\mathrm{points}}, 3)`$, one point per row.
    ///
    /// # Errors
    ///
    /// Errors if `points` does not have exactly three columns.
    pub fn set_points(&mut self, points: Array2<f64>) -> Result<&mut Self, anyhow::Error> {
        ensure!(
            points.ncols() == 3,
            "Evaluation points must have 3 coordinates, but {} are given.",
            points.ncols()
        );
        self.points = Some(points);
        Ok(self)
    }

    /// The number of atomic orbitals, or `None` if no basis has been loaded.
    pub fn ao_num(&self) -> Option<usize> {
        self.basis_set.as_ref().map(BasisSet::n_funcs)
    }

    /// The number of evaluation points, or `None` if no points have been set.
    pub fn point_num(&self) -> Option<usize> {
        self.points.as_ref().map(|points| points.nrows())
    }

    /// Evaluates all atomic orbitals at all evaluation points.
    ///
    /// # Returns
    ///
    /// An array of shape $`(N_{\mathrm{points}}, N_{\mathrm{AO}})`$.
    ///
    /// # Errors
    ///
    /// Errors if no basis has been loaded or no points have been set.
    pub fn ao_values(&self) -> Result<Array2<f64>, anyhow::Error> {
        let basis_set = self
            .basis_set
            .as_ref()
            .ok_or_else(|| format_err!("No basis has been loaded into the batch kernel."))?;
        let points = self
            .points
            .as_ref()
            .ok_or_else(|| format_err!("No evaluation points have been set in the batch kernel."))?;
        Ok(basis_set.values_at(&points.view()))
    }
}

// ----------------
// BatchAoEvaluator
// ----------------

/// Overlap evaluation on the whole grid at once: $`\mathbf{S} = \boldsymbol{\chi}^{\mathsf{T}}
/// \boldsymbol{\chi}\, \Delta V`$ where $`\boldsymbol{\chi}`$ holds the values of all atomic
/// orbitals at all grid points.
#[derive(Clone, Debug)]
pub struct BatchAoEvaluator {
    kernel: BatchAoKernel,
}

impl BatchAoEvaluator {
    /// Creates a batch evaluator whose kernel is loaded from `source`.
    pub fn new(source: &dyn TrexioSource) -> Result<Self, anyhow::Error> {
        let mut kernel = BatchAoKernel::new();
        kernel.load(source)?;
        Ok(Self { kernel })
    }
}

impl AoEvaluator for BatchAoEvaluator {
    fn kind(&self) -> AoEvaluatorKind {
        AoEvaluatorKind::Batch
    }

    fn ao_num(&self) -> usize {
        self.kernel.ao_num().unwrap_or(0)
    }

    fn overlap(&mut self, grid: &IntegrationGrid) -> Result<Array2<f64>, anyhow::Error> {
        self.kernel.set_points(grid.points())?;
        let chi = self.kernel.ao_values()?;
        log::debug!(
            "Batch kernel evaluated {} atomic orbitals at {} points.",
            chi.ncols(),
            chi.nrows()
        );
        let sao = chi.t().dot(&chi) * grid.voxel_volume();
        // Release the point cloud.
        self.kernel.points = None;
        Ok(sao)
    }
}
