//! Contracted Gaussian basis sets and their values in real space.

use std::error::Error;
use std::fmt;

use anyhow::{self, bail};
use itertools::Itertools;
use log;
use nalgebra::Point3;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};

use crate::basis::ao::BasisShell;
use crate::basis::solid_harmonics::AngularPolynomial;
use crate::basis::BasisKind;
use crate::interfaces::trexio::TrexioAoBasis;

#[cfg(test)]
#[path = "gaussian_tests.rs"]
mod gaussian_tests;

// ======
// Errors
// ======

/// Errors arising when a basis set cannot be built from the data provided.
#[derive(Debug, Clone, PartialEq)]
pub enum BasisSetError {
    /// The basis is not made of Gaussian functions. Only Gaussian bases can be evaluated.
    NonGaussianBasis(BasisKind),

    /// The shell, primitive, or atomic-orbital tables are mutually inconsistent.
    InconsistentData(String),
}

impl fmt::Display for BasisSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonGaussianBasis(kind) => write!(
                f,
                "Basis set error: the basis type is `{kind}`, but only `Gaussian` bases are supported."
            ),
            Self::InconsistentData(msg) => write!(f, "Basis set error: {msg}"),
        }
    }
}

impl Error for BasisSetError {}

/// Returns an [`BasisSetError::InconsistentData`] error if the condition is not met.
macro_rules! ensure_consistent {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            bail!(BasisSetError::InconsistentData(format!($($arg)*)));
        }
    };
}

// -------------------
// GaussianContraction
// -------------------

/// A structure to handle primitives in a Gaussian contraction.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianContraction {
    /// Constituent primitives in the contraction. Each primitive of the form
    /// $`c\exp\left[-\alpha\lvert \mathbf{r} - \mathbf{R} \rvert^2\right]`$ is characterised by a
    /// tuple of its exponent $`\alpha`$ and coefficient $`c`$, respectively. The coefficient
    /// already includes the primitive normalisation factor.
    pub primitives: Vec<(f64, f64)>,
}

impl GaussianContraction {
    /// The number of primitive Gaussians in this contraction.
    pub fn contraction_length(&self) -> usize {
        self.primitives.len()
    }
}

// ---------------------
// BasisShellContraction
// ---------------------

/// A structure to handle all information of a contracted shell required for its evaluation.
#[derive(Clone, Debug)]
pub struct BasisShellContraction {
    /// Basis function ordering information.
    pub basis_shell: BasisShell,

    /// The Gaussian primitives in the contraction of this shell.
    pub contraction: GaussianContraction,

    /// The Cartesian origin $`\mathbf{R}`$ of this shell.
    pub cart_origin: Point3<f64>,

    /// The normalisation factor of the shell.
    pub shell_factor: f64,

    /// The power $`n`$ of the $`|\mathbf{r} - \mathbf{R}|^n`$ prefactor of the radial part.
    pub r_power: i32,

    /// The normalisation factors of the functions in this shell, in shell order.
    pub ao_normalisations: Vec<f64>,

    /// The angular polynomials of the functions in this shell, in shell order.
    angular: Vec<AngularPolynomial>,
}

impl BasisShellContraction {
    /// Constructs a new contracted shell.
    ///
    /// # Arguments
    ///
    /// * `basis_shell` - The angular information of the shell.
    /// * `contraction` - The Gaussian primitives of the shell.
    /// * `cart_origin` - The centre of the shell.
    /// * `shell_factor` - The normalisation factor of the shell.
    /// * `r_power` - The power of the radial prefactor.
    /// * `ao_normalisations` - The normalisation factors of the functions in the shell.
    ///
    /// # Errors
    ///
    /// Errors if the number of normalisation factors does not match the number of functions in
    /// the shell.
    pub fn new(
        basis_shell: BasisShell,
        contraction: GaussianContraction,
        cart_origin: Point3<f64>,
        shell_factor: f64,
        r_power: i32,
        ao_normalisations: Vec<f64>,
    ) -> Result<Self, anyhow::Error> {
        ensure_consistent!(
            ao_normalisations.len() == basis_shell.n_funcs(),
            "shell of rank {} has {} functions but {} normalisation factors are given.",
            basis_shell.l,
            basis_shell.n_funcs(),
            ao_normalisations.len()
        );
        let angular = AngularPolynomial::for_shell(&basis_shell);
        Ok(Self {
            basis_shell,
            contraction,
            cart_origin,
            shell_factor,
            r_power,
            ao_normalisations,
            angular,
        })
    }

    /// The number of basis functions in this shell.
    pub fn n_funcs(&self) -> usize {
        self.basis_shell.n_funcs()
    }

    /// The number of primitive Gaussians in this shell.
    pub fn contraction_length(&self) -> usize {
        self.contraction.contraction_length()
    }

    /// The radial part of this shell at a squared distance `r2` from its centre.
    fn radial(&self, r2: f64) -> f64 {
        let gaussians = self
            .contraction
            .primitives
            .iter()
            .map(|(alpha, c)| c * (-alpha * r2).exp())
            .sum::<f64>();
        if self.r_power == 0 {
            self.shell_factor * gaussians
        } else {
            self.shell_factor * r2.sqrt().powi(self.r_power) * gaussians
        }
    }

    /// Evaluates all functions in this shell at a single point.
    ///
    /// # Returns
    ///
    /// A vector of function values in shell order.
    pub fn value_at(&self, point: &Point3<f64>) -> Array1<f64> {
        let d = point - self.cart_origin;
        let radial = self.radial(d.norm_squared());
        self.angular
            .iter()
            .zip(self.ao_normalisations.iter())
            .map(|(poly, norm)| norm * poly.eval(d[0], d[1], d[2]) * radial)
            .collect()
    }

    /// Evaluates all functions in this shell at many points.
    ///
    /// # Arguments
    ///
    /// * `points` - An array of shape $`(N_{\mathrm{points}}, 3)`$ containing the points.
    ///
    /// # Returns
    ///
    /// An array of shape $`(N_{\mathrm{points}}, N_{\mathrm{funcs}})`$.
    pub fn values_at(&self, points: &ArrayView2<f64>) -> Array2<f64> {
        let xs = points.column(0).mapv(|x| x - self.cart_origin[0]);
        let ys = points.column(1).mapv(|y| y - self.cart_origin[1]);
        let zs = points.column(2).mapv(|z| z - self.cart_origin[2]);
        let r2s = &xs * &xs + &ys * &ys + &zs * &zs;
        let radials = r2s.mapv(|r2| self.radial(r2));
        let mut values = Array2::<f64>::zeros((points.nrows(), self.n_funcs()));
        values
            .axis_iter_mut(Axis(1))
            .zip(self.angular.iter().zip(self.ao_normalisations.iter()))
            .for_each(|(mut column, (poly, norm))| {
                let angular = poly.eval_many(&xs.view(), &ys.view(), &zs.view());
                column.assign(&(angular * &radials * *norm));
            });
        values
    }
}

// --------
// BasisSet
// --------

/// A structure to manage the contracted Gaussian shells of a system, ordered so that the
/// functions of consecutive shells follow the atomic-orbital order of the source.
#[derive(Clone, Debug)]
pub struct BasisSet {
    /// The shells in atomic-orbital order.
    shells: Vec<BasisShellContraction>,

    /// The function boundaries for the shells.
    shell_boundaries: Vec<(usize, usize)>,
}

impl BasisSet {
    /// Creates a new [`BasisSet`] structure from a vector of shells in atomic-orbital order.
    pub fn new(shells: Vec<BasisShellContraction>) -> Self {
        let shell_boundaries = shells
            .iter()
            .scan(0, |acc, bsc| {
                let shell_length = bsc.n_funcs();
                let boundary = (*acc, *acc + shell_length);
                *acc += shell_length;
                Some(boundary)
            })
            .collect::<Vec<_>>();
        Self {
            shells,
            shell_boundaries,
        }
    }

    /// Builds a Gaussian basis set from a TREXIO atomic-orbital basis descriptor.
    ///
    /// The atomic orbitals of each shell must occupy a contiguous block in the atomic-orbital
    /// list, and the size of that block must equal the number of functions in the shell.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisSetError::NonGaussianBasis`] if the basis is not of Gaussian type, and
    /// with [`BasisSetError::InconsistentData`] if the tables in the descriptor disagree with one
    /// another.
    pub fn from_trexio(ao_basis: &TrexioAoBasis) -> Result<Self, anyhow::Error> {
        if ao_basis.kind != BasisKind::Gaussian {
            bail!(BasisSetError::NonGaussianBasis(ao_basis.kind));
        }

        let basis = &ao_basis.basis;
        let ao = &ao_basis.ao;
        let nuclei = &ao_basis.nuclei;
        let shell_num = basis.shell_num;
        let prim_num = basis.prim_num;

        ensure_consistent!(
            basis.nucleus_index.len() == shell_num
                && basis.shell_ang_mom.len() == shell_num
                && basis.shell_factor.len() == shell_num,
            "per-shell arrays do not all have `basis.shell_num` = {shell_num} entries."
        );
        if let Some(r_power) = basis.r_power.as_ref() {
            ensure_consistent!(
                r_power.len() == shell_num,
                "`basis.r_power` has {} entries but `basis.shell_num` is {shell_num}.",
                r_power.len()
            );
            ensure_consistent!(
                r_power.iter().all(|&n| n >= 0),
                "`basis.r_power` contains negative powers, which are singular at the nuclei."
            );
        }
        ensure_consistent!(
            basis.shell_index.len() == prim_num
                && basis.exponent.len() == prim_num
                && basis.coefficient.len() == prim_num
                && basis.prim_factor.len() == prim_num,
            "per-primitive arrays do not all have `basis.prim_num` = {prim_num} entries."
        );
        ensure_consistent!(
            ao.shell.len() == ao.num && ao.normalization.len() == ao.num,
            "per-AO arrays do not all have `ao.num` = {} entries.",
            ao.num
        );
        if let Some(nucleus_i) = basis
            .nucleus_index
            .iter()
            .find(|&&i| i >= nuclei.n_nuclei())
        {
            bail!(BasisSetError::InconsistentData(format!(
                "shell centred on nucleus {nucleus_i}, but only {} nuclei exist.",
                nuclei.n_nuclei()
            )));
        }
        if let Some(shell_i) = basis
            .shell_index
            .iter()
            .chain(ao.shell.iter())
            .find(|&&i| i >= shell_num)
        {
            bail!(BasisSetError::InconsistentData(format!(
                "reference to shell {shell_i}, but only {shell_num} shells exist."
            )));
        }

        let cart = ao.cartesian != 0;
        let mut primitives_per_shell = vec![Vec::<(f64, f64)>::new(); shell_num];
        basis
            .shell_index
            .iter()
            .zip(basis.exponent.iter())
            .zip(basis.coefficient.iter().zip(basis.prim_factor.iter()))
            .for_each(|((&shell_i, &alpha), (&c, &f))| {
                primitives_per_shell[shell_i].push((alpha, c * f));
            });

        // Consecutive runs of atomic orbitals sharing the same shell index.
        let runs = ao
            .shell
            .iter()
            .enumerate()
            .group_by(|(_, shell_i)| **shell_i)
            .into_iter()
            .map(|(shell_i, group)| {
                let ao_indices = group.map(|(ao_i, _)| ao_i).collect_vec();
                (shell_i, ao_indices)
            })
            .collect_vec();

        let mut seen = vec![false; shell_num];
        let shells = runs
            .into_iter()
            .map(|(shell_i, ao_indices)| {
                ensure_consistent!(
                    !seen[shell_i],
                    "the atomic orbitals of shell {shell_i} are not contiguous."
                );
                seen[shell_i] = true;
                let l = basis.shell_ang_mom[shell_i];
                let basis_shell = BasisShell::trexio(l, cart);
                ensure_consistent!(
                    ao_indices.len() == basis_shell.n_funcs(),
                    "shell {shell_i} with l = {l} should have {} {} functions, but {} atomic orbitals refer to it.",
                    basis_shell.n_funcs(),
                    if cart { "Cartesian" } else { "pure" },
                    ao_indices.len()
                );
                let ao_normalisations = ao_indices
                    .iter()
                    .map(|&ao_i| ao.normalization[ao_i])
                    .collect_vec();
                let r_power = basis
                    .r_power
                    .as_ref()
                    .map(|r_power| r_power[shell_i])
                    .unwrap_or(0);
                BasisShellContraction::new(
                    basis_shell,
                    GaussianContraction {
                        primitives: primitives_per_shell[shell_i].clone(),
                    },
                    nuclei.coordinates[basis.nucleus_index[shell_i]],
                    basis.shell_factor[shell_i],
                    r_power,
                    ao_normalisations,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(missing) = seen.iter().position(|s| !s) {
            bail!(BasisSetError::InconsistentData(format!(
                "shell {missing} has no atomic orbitals."
            )));
        }

        let basis_set = Self::new(shells);
        log::debug!(
            "Gaussian basis set built with {} shells, {} primitives, and {} functions.",
            basis_set.n_shells(),
            basis_set
                .all_shells()
                .map(BasisShellContraction::contraction_length)
                .sum::<usize>(),
            basis_set.n_funcs()
        );
        Ok(basis_set)
    }

    /// The number of shells in the basis set.
    pub fn n_shells(&self) -> usize {
        self.shells.len()
    }

    /// The number of basis functions in the basis set.
    pub fn n_funcs(&self) -> usize {
        self.shell_boundaries
            .last()
            .map(|(_, end)| *end)
            .unwrap_or(0)
    }

    /// Returns the function shell boundaries.
    pub fn shell_boundaries(&self) -> &Vec<(usize, usize)> {
        &self.shell_boundaries
    }

    /// Returns an iterator over all shells in the basis set.
    pub fn all_shells(&self) -> impl Iterator<Item = &BasisShellContraction> {
        self.shells.iter()
    }

    /// Evaluates all basis functions at a single point.
    ///
    /// # Returns
    ///
    /// A vector of length $`N_{\mathrm{funcs}}`$ in atomic-orbital order.
    pub fn value_at(&self, point: &Point3<f64>) -> Array1<f64> {
        let mut values = Array1::<f64>::zeros(self.n_funcs());
        self.shells
            .iter()
            .zip(self.shell_boundaries.iter())
            .for_each(|(shell, (start, end))| {
                values
                    .slice_mut(s![*start..*end])
                    .assign(&shell.value_at(point));
            });
        values
    }

    /// Evaluates all basis functions at many points.
    ///
    /// # Arguments
    ///
    /// * `points` - An array of shape $`(N_{\mathrm{points}}, 3)`$ containing the points.
    ///
    /// # Returns
    ///
    /// An array of shape $`(N_{\mathrm{points}}, N_{\mathrm{funcs}})`$ in atomic-orbital order.
    pub fn values_at(&self, points: &ArrayView2<f64>) -> Array2<f64> {
        let mut values = Array2::<f64>::zeros((points.nrows(), self.n_funcs()));
        self.shells
            .iter()
            .zip(self.shell_boundaries.iter())
            .for_each(|(shell, (start, end))| {
                values
                    .slice_mut(s![.., *start..*end])
                    .assign(&shell.values_at(points));
            });
        values
    }
}
