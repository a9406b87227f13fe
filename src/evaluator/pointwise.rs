//! Point-by-point evaluation of atomic orbitals.

use anyhow::{self, ensure};
use nalgebra::Point3;
use ndarray::{linalg::general_mat_mul, Array2, Axis};

use crate::basis::gaussian::BasisSet;
use crate::evaluator::{AoEvaluator, AoEvaluatorKind};
use crate::grid::IntegrationGrid;
use crate::interfaces::trexio::TrexioAoBasis;

/// Overlap evaluation one grid point at a time:
/// $`\mathbf{S} = \sum_{\mathbf{r}} \boldsymbol{\chi}(\mathbf{r})
/// \boldsymbol{\chi}(\mathbf{r})^{\mathsf{T}}\, \Delta V`$.
#[derive(Clone, Debug)]
pub struct PointwiseAoEvaluator {
    basis_set: BasisSet,
}

impl PointwiseAoEvaluator {
    /// Creates a pointwise evaluator from an atomic-orbital basis descriptor.
    ///
    /// # Errors
    ///
    /// Errors if the basis is not of Gaussian type or is otherwise inconsistent.
    pub fn new(ao_basis: &TrexioAoBasis) -> Result<Self, anyhow::Error> {
        let basis_set = BasisSet::from_trexio(ao_basis)?;
        ensure!(
            basis_set.n_funcs() == ao_basis.ao_num(),
            "The basis set has {} functions but `ao.num` is {}.",
            basis_set.n_funcs(),
            ao_basis.ao_num()
        );
        Ok(Self { basis_set })
    }
}

impl AoEvaluator for PointwiseAoEvaluator {
    fn kind(&self) -> AoEvaluatorKind {
        AoEvaluatorKind::Pointwise
    }

    fn ao_num(&self) -> usize {
        self.basis_set.n_funcs()
    }

    fn overlap(&mut self, grid: &IntegrationGrid) -> Result<Array2<f64>, anyhow::Error> {
        let nao = self.ao_num();
        let dv = grid.voxel_volume();
        let mut sao = Array2::<f64>::zeros((nao, nao));
        for &x in grid.axis(0) {
            for &y in grid.axis(1) {
                for &z in grid.axis(2) {
                    let chi = self.basis_set.value_at(&Point3::new(x, y, z));
                    let col = chi.view().insert_axis(Axis(1));
                    let row = chi.view().insert_axis(Axis(0));
                    general_mat_mul(dv, &col, &row, 1.0, &mut sao);
                }
            }
        }
        Ok(sao)
    }
}
