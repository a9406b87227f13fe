//! Sets of nuclei on which atomic-orbital shells are centred.

use std::fmt;

use anyhow::{self, ensure};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::interfaces::trexio::TrexioNucleus;

#[cfg(test)]
#[path = "nucleus_tests.rs"]
mod nucleus_tests;

/// An ordered, read-only set of nuclei.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NucleusSet {
    /// The Cartesian coordinates of the nuclei.
    pub coordinates: Vec<Point3<f64>>,

    /// The optional nuclear charges.
    pub charges: Option<Vec<f64>>,

    /// The optional atom labels.
    pub labels: Option<Vec<String>>,
}

impl NucleusSet {
    /// Constructs a set of nuclei from their coordinates only.
    pub fn new(coordinates: &[Point3<f64>]) -> Self {
        Self {
            coordinates: coordinates.to_vec(),
            charges: None,
            labels: None,
        }
    }

    /// Constructs a set of nuclei from a TREXIO `nucleus` group.
    ///
    /// # Errors
    ///
    /// Errors if the lengths of the coordinate, charge, or label arrays are inconsistent with the
    /// number of nuclei.
    pub fn from_trexio(nucleus: &TrexioNucleus) -> Result<Self, anyhow::Error> {
        ensure!(
            nucleus.coord.len() == nucleus.num,
            "`nucleus.num` is {} but {} coordinate triples are given.",
            nucleus.num,
            nucleus.coord.len()
        );
        if let Some(charges) = nucleus.charge.as_ref() {
            ensure!(
                charges.len() == nucleus.num,
                "`nucleus.num` is {} but {} charges are given.",
                nucleus.num,
                charges.len()
            );
        }
        if let Some(labels) = nucleus.label.as_ref() {
            ensure!(
                labels.len() == nucleus.num,
                "`nucleus.num` is {} but {} labels are given.",
                nucleus.num,
                labels.len()
            );
        }
        Ok(Self {
            coordinates: nucleus
                .coord
                .iter()
                .map(|xyz| Point3::new(xyz[0], xyz[1], xyz[2]))
                .collect(),
            charges: nucleus.charge.clone(),
            labels: nucleus.label.clone(),
        })
    }

    /// The number of nuclei in this set.
    pub fn n_nuclei(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns the corners of the axis-aligned bounding box of the nuclei, or `None` if there
    /// are no nuclei.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.coordinates.first()?;
        Some(self.coordinates.iter().skip(1).fold(
            (*first, *first),
            |(rmin, rmax), coord| (rmin.inf(coord), rmax.sup(coord)),
        ))
    }
}

impl fmt::Display for NucleusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "┈".repeat(58))?;
        writeln!(
            f,
            "{:>5} {:>7} {:>7} {:>12} {:>12} {:>12}",
            "#", "Label", "Charge", "x", "y", "z"
        )?;
        writeln!(f, "{}", "┈".repeat(58))?;
        for (i, coord) in self.coordinates.iter().enumerate() {
            let label = self
                .labels
                .as_ref()
                .and_then(|labels| labels.get(i).cloned())
                .unwrap_or_else(|| "--".to_string());
            let charge = self
                .charges
                .as_ref()
                .and_then(|charges| charges.get(i))
                .map(|charge| format!("{charge:.1}"))
                .unwrap_or_else(|| "--".to_string());
            writeln!(
                f,
                "{:>5} {:>7} {:>7} {:>+12.7} {:>+12.7} {:>+12.7}",
                i, label, charge, coord[0], coord[1], coord[2]
            )?;
        }
        writeln!(f, "{}", "┈".repeat(58))?;
        Ok(())
    }
}
