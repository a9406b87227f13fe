//! Uniform Cartesian integration grids enclosing a set of nuclei.

use std::error::Error;
use std::fmt;

use anyhow::{self, bail};
use itertools::iproduct;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::auxiliary::nucleus::NucleusSet;


/// The margin added to each side of the nuclear bounding box along every axis, in the length
/// unit of the data source.
pub const GRID_PADDING: f64 = 8.0;

// ======
// Errors
// ======

/// Errors arising when an integration grid cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Fewer than two points per axis have been requested.
    TooFewPoints(usize),

    /// There are no nuclei to enclose.
    NoNuclei,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints(n) => write!(
                f,
                "Grid error: at least 2 points per axis are required, but {n} requested."
            ),
            Self::NoNuclei => write!(f, "Grid error: no nuclei to build a grid around."),
        }
    }
}

impl Error for GridError {}

// ===============
// IntegrationGrid
// ===============

/// A uniform Cartesian grid spanning the padded bounding box of a set of nuclei.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationGrid {
    /// The sample coordinates along the $`x`$, $`y`$, and $`z`$ axes.
    axes: [Array1<f64>; 3],

    /// The step sizes along the $`x`$, $`y`$, and $`z`$ axes.
    steps: [f64; 3],
}

impl IntegrationGrid {
    /// Builds a grid of `n` points per axis over the bounding box of `nuclei`, padded by
    /// [`GRID_PADDING`] on every side. Both ends of each padded interval are included.
    ///
    /// # Errors
    ///
    /// Errors with a [`GridError`] if `n < 2` or if there are no nuclei.
    pub fn new(nuclei: &NucleusSet, n: usize) -> Result<Self, anyhow::Error> {
        if n < 2 {
            bail!(GridError::TooFewPoints(n));
        }
        let Some((rmin, rmax)) = nuclei.bounding_box() else {
            bail!(GridError::NoNuclei);
        };
        let starts = rmin.map(|c| c - GRID_PADDING);
        let stops = rmax.map(|c| c + GRID_PADDING);
        let axes = [0, 1, 2].map(|i| Array1::linspace(starts[i], stops[i], n));
        let steps = [0, 1, 2].map(|i| (stops[i] - starts[i]) / (n - 1) as f64);
        log::debug!(
            "Integration grid: {n}^3 points, steps [{:.6}, {:.6}, {:.6}].",
            steps[0],
            steps[1],
            steps[2]
        );
        Ok(Self { axes, steps })
    }

    /// Returns the sample coordinates along axis `i` (`0`, `1`, or `2` for $`x`$, $`y`$, or
    /// $`z`$).
    pub fn axis(&self, i: usize) -> ArrayView1<'_, f64> {
        self.axes[i].view()
    }

    /// Returns the sample coordinates along all three axes.
    pub fn axes(&self) -> &[Array1<f64>; 3] {
        &self.axes
    }

    /// Returns the step sizes along the three axes.
    pub fn steps(&self) -> [f64; 3] {
        self.steps
    }

    /// The volume element $`\mathrm{d}x\,\mathrm{d}y\,\mathrm{d}z`$ used as the quadrature
    /// weight.
    pub fn voxel_volume(&self) -> f64 {
        self.steps.iter().product()
    }

    /// The total number of grid points.
    pub fn n_points(&self) -> usize {
        self.axes.iter().map(|axis| axis.len()).product()
    }

    /// Returns an iterator over all grid points with $`x`$ outermost and $`z`$ innermost.
    pub fn iter_points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        iproduct!(self.axes[0].iter(), self.axes[1].iter(), self.axes[2].iter())
            .map(|(&x, &y, &z)| [x, y, z])
    }

    /// Returns all grid points as an array of shape $`(N_{\mathrm{points}}, 3)`$, in the order
    /// of [`Self::iter_points`].
    pub fn points(&self) -> Array2<f64> {
        let mut points = Array2::<f64>::zeros((self.n_points(), 3));
        points
            .rows_mut()
            .into_iter()
            .zip(self.iter_points())
            .for_each(|(mut row, xyz)| {
                row[0] = xyz[0];
                row[1] = xyz[1];
                row[2] = xyz[2];
            });
        points
    }
}
