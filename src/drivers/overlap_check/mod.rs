//! Driver for checking stored atomic-orbital overlap integrals by numerical quadrature.

use std::error::Error;
use std::fmt;

use anyhow::{self, bail, format_err};
use derive_builder::Builder;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::drivers::AoCheckDriver;
use crate::evaluator::{build_evaluator, AoEvaluatorKind};
use crate::grid::{IntegrationGrid, GRID_PADDING};
use crate::interfaces::trexio::{TrexioAoBasis, TrexioSource};
use crate::io::format::{aocheck_output, log_title, nice_bool, AoCheckOutput};
use crate::io::{write_aocheck_binary, AoCheckFileType};

#[cfg(test)]
#[path = "overlap_check_tests.rs"]
mod overlap_check_tests;

// ======
// Errors
// ======

/// Errors arising when the data source does not permit an overlap check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlapCheckError {
    /// The data source contains no reference overlap matrix. The associated string names the
    /// data source.
    MissingReference(String),

    /// The reference overlap matrix does not have the shape expected from the number of atomic
    /// orbitals.
    ReferenceShape {
        /// The expected shape.
        expected: (usize, usize),

        /// The shape found in the data source.
        found: (usize, usize),
    },
}

impl fmt::Display for OverlapCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReference(name) => write!(
                f,
                "One-electron overlap integrals are missing in `{name}`. They are required for the overlap check."
            ),
            Self::ReferenceShape { expected, found } => write!(
                f,
                "The reference overlap matrix has shape {found:?}, but shape {expected:?} is expected."
            ),
        }
    }
}

impl Error for OverlapCheckError {}

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

/// A structure containing control parameters for the overlap check.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct OverlapCheckParams {
    /// The number of grid points along each Cartesian axis. The grid has this number cubed
    /// points in total.
    #[builder(default = "50")]
    pub grid_resolution: usize,

    /// The strategy used to evaluate the atomic orbitals on the grid.
    #[builder(default = "AoEvaluatorKind::Batch")]
    pub evaluator: AoEvaluatorKind,

    /// Boolean indicating if the computed and reference values of every atomic-orbital pair are
    /// to be written to the output. If `false`, only the summary is written.
    #[builder(default = "true")]
    pub write_pairs: bool,

    /// Optional name for saving the result as a binary file of type [`AoCheckFileType::Ovl`]. If
    /// `None`, the result will not be saved.
    #[builder(default = "None")]
    pub result_save_name: Option<String>,
}

impl OverlapCheckParamsBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.grid_resolution {
            Some(n) if n < 2 => Err(format!(
                "At least 2 grid points per axis are required, but {n} requested."
            )),
            _ => Ok(()),
        }
    }
}

impl OverlapCheckParams {
    /// Returns a builder to construct a [`OverlapCheckParams`] structure.
    pub fn builder() -> OverlapCheckParamsBuilder {
        OverlapCheckParamsBuilder::default()
    }
}

impl Default for OverlapCheckParams {
    fn default() -> Self {
        Self {
            grid_resolution: 50,
            evaluator: AoEvaluatorKind::Batch,
            write_pairs: true,
            result_save_name: None,
        }
    }
}

impl fmt::Display for OverlapCheckParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid points per axis: {}", self.grid_resolution)?;
        writeln!(f, "Grid padding: {GRID_PADDING:.1}")?;
        writeln!(f, "Atomic-orbital evaluator: {}", self.evaluator)?;
        writeln!(f, "Write all pairs: {}", nice_bool(self.write_pairs))?;
        writeln!(
            f,
            "Save overlap-check results to file: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                format!("{name}.{}", AoCheckFileType::Ovl.ext())
            } else {
                nice_bool(false)
            }
        )?;
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain overlap-check results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct OverlapCheckResult {
    /// The control parameters used to obtain this set of results.
    pub parameters: OverlapCheckParams,

    /// The integration steps along the three Cartesian axes.
    pub steps: [f64; 3],

    /// The voxel volume used as the quadrature weight.
    pub voxel_volume: f64,

    /// The overlap matrix computed by quadrature.
    pub computed_overlap: Array2<f64>,

    /// The overlap matrix stored in the data source.
    pub reference_overlap: Array2<f64>,

    /// The Frobenius norm of the difference between the computed and reference matrices.
    pub error_norm: f64,

    /// The largest absolute element of the difference between the computed and reference
    /// matrices.
    pub max_abs_error: f64,
}

impl OverlapCheckResult {
    /// Returns a builder to construct a [`OverlapCheckResult`] structure.
    fn builder() -> OverlapCheckResultBuilder {
        OverlapCheckResultBuilder::default()
    }

    /// The number of atomic orbitals.
    pub fn ao_num(&self) -> usize {
        self.computed_overlap.nrows()
    }

    /// Returns an iterator over all atomic-orbital pairs $`(i, j)`$ with $`i \le j`$, together
    /// with their computed and reference overlaps.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64, f64)> + '_ {
        let nao = self.ao_num();
        (0..nao).flat_map(move |i| {
            (i..nao).map(move |j| {
                (
                    i,
                    j,
                    self.computed_overlap[(i, j)],
                    self.reference_overlap[(i, j)],
                )
            })
        })
    }
}

impl fmt::Display for OverlapCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Integration steps: [{:.6}, {:.6}, {:.6}]",
            self.steps[0], self.steps[1], self.steps[2]
        )?;
        writeln!(f)?;
        if self.parameters.write_pairs {
            for (i, j, s, s_ref) in self.pairs() {
                writeln!(f, "{i:>3} {j:>3} {s:>15.6} {s_ref:>15.6}")?;
            }
        }
        writeln!(f, "Norm of the error: {:.6}", self.error_norm)?;
        writeln!(f, "Largest absolute error: {:.6e}", self.max_abs_error)?;
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for checking the atomic-orbital overlap integrals stored in a TREXIO data source.
///
/// The overlap matrix is computed by summing products of atomic-orbital values over a uniform
/// grid enclosing the nuclei, then compared against the stored reference.
#[derive(Clone, Builder)]
pub struct OverlapCheckDriver<'a> {
    /// The control parameters for the overlap check.
    parameters: &'a OverlapCheckParams,

    /// The data source containing the basis and the reference overlap matrix.
    source: &'a dyn TrexioSource,

    /// The result of the overlap check.
    #[builder(setter(skip), default = "None")]
    result: Option<OverlapCheckResult>,
}

impl<'a> OverlapCheckDriver<'a> {
    /// Returns a builder to construct a [`OverlapCheckDriver`] structure.
    pub fn builder() -> OverlapCheckDriverBuilder<'a> {
        OverlapCheckDriverBuilder::default()
    }

    /// Executes the overlap check.
    fn check_overlap(&mut self) -> Result<(), anyhow::Error> {
        log_title("Atomic-Orbital Overlap Check");
        aocheck_output!("");
        let params = self.parameters;
        params.log_output_display();

        if !self.source.has_ao_1e_int_overlap()? {
            bail!(OverlapCheckError::MissingReference(self.source.name()));
        }

        let ao_basis = TrexioAoBasis::read(self.source)?;
        aocheck_output!("Data source: {}", self.source.name());
        aocheck_output!("Basis type: {}", ao_basis.kind);
        aocheck_output!("Number of atomic orbitals: {}", ao_basis.ao_num());
        ao_basis.nuclei.log_output_display();
        aocheck_output!("");

        // The evaluator validates the basis, so any failure occurs before the grid is touched.
        let mut evaluator = build_evaluator(params.evaluator, &ao_basis, self.source)?;
        let grid = IntegrationGrid::new(&ao_basis.nuclei, params.grid_resolution)?;
        log::debug!(
            "Evaluating the overlap matrix on {} points with the {} evaluator.",
            grid.n_points(),
            evaluator.kind()
        );
        let computed_overlap = evaluator.overlap(&grid)?;

        let reference_overlap = self.source.read_ao_1e_int_overlap()?;
        if reference_overlap.dim() != computed_overlap.dim() {
            bail!(OverlapCheckError::ReferenceShape {
                expected: computed_overlap.dim(),
                found: reference_overlap.dim(),
            });
        }

        let diff = &computed_overlap - &reference_overlap;
        let error_norm = diff.iter().map(|x| x * x).sum::<f64>().sqrt();
        let max_abs_error = diff.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));

        let result = OverlapCheckResult::builder()
            .parameters(params.clone())
            .steps(grid.steps())
            .voxel_volume(grid.voxel_volume())
            .computed_overlap(computed_overlap)
            .reference_overlap(reference_overlap)
            .error_norm(error_norm)
            .max_abs_error(max_abs_error)
            .build()
            .map_err(|err| format_err!(err))?;
        result.log_output_display();
        aocheck_output!("");

        if let Some(name) = params.result_save_name.as_ref() {
            write_aocheck_binary(name, AoCheckFileType::Ovl, &result)?;
            aocheck_output!(
                "Overlap-check results saved as {name}.{}.",
                AoCheckFileType::Ovl.ext()
            );
            aocheck_output!("");
        }

        self.result = Some(result);
        Ok(())
    }
}

impl<'a> AoCheckDriver for OverlapCheckDriver<'a> {
    type Params = OverlapCheckParams;

    type Outcome = OverlapCheckResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No overlap-check results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.check_overlap()
    }
}
