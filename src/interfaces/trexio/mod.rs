//! `aocheck` interfaces with TREXIO data containers.
//!
//! Only the groups needed for overlap checking are modelled: `nucleus`, `basis`, `ao`, and
//! `ao_1e_int`. Field names follow the TREXIO format. All indices are 0-based.

use std::path::{Path, PathBuf};

use anyhow::{self, bail, ensure, format_err, Context};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::auxiliary::nucleus::NucleusSet;
use crate::basis::BasisKind;
use crate::io::read_aocheck_yaml;

#[cfg(feature = "trexio-hdf5")]
pub mod hdf5;


// ==================
// Struct definitions
// ==================

/// The TREXIO `nucleus` group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrexioNucleus {
    /// The number of nuclei.
    pub num: usize,

    /// The Cartesian coordinates of the nuclei in bohr.
    pub coord: Vec<[f64; 3]>,

    /// The optional nuclear charges.
    #[serde(default)]
    pub charge: Option<Vec<f64>>,

    /// The optional atom labels.
    #[serde(default)]
    pub label: Option<Vec<String>>,
}

/// The TREXIO `basis` group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrexioBasis {
    /// The type of the basis set (`Gaussian`, `Slater`, `Numerical`, or `PW`).
    #[serde(rename = "type")]
    pub basis_type: String,

    /// The total number of shells.
    pub shell_num: usize,

    /// The total number of primitives.
    pub prim_num: usize,

    /// The index of the nucleus on which each shell is centred.
    pub nucleus_index: Vec<usize>,

    /// The angular momentum of each shell.
    pub shell_ang_mom: Vec<u32>,

    /// The normalisation factor of each shell.
    pub shell_factor: Vec<f64>,

    /// The power of $`|\mathbf{r} - \mathbf{R}|`$ multiplying the radial part of each shell.
    /// If absent, all powers are zero.
    #[serde(default)]
    pub r_power: Option<Vec<i32>>,

    /// The index of the shell to which each primitive belongs.
    pub shell_index: Vec<usize>,

    /// The exponent of each primitive.
    pub exponent: Vec<f64>,

    /// The contraction coefficient of each primitive.
    pub coefficient: Vec<f64>,

    /// The normalisation factor of each primitive.
    pub prim_factor: Vec<f64>,
}

/// The TREXIO `ao` group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrexioAo {
    /// `1` if the atomic orbitals are Cartesian functions, `0` if they are real solid harmonics.
    pub cartesian: i32,

    /// The number of atomic orbitals.
    pub num: usize,

    /// The index of the shell to which each atomic orbital belongs.
    pub shell: Vec<usize>,

    /// The normalisation factor of each atomic orbital.
    pub normalization: Vec<f64>,
}

/// The TREXIO `ao_1e_int` group, restricted to the overlap integrals.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrexioAo1eInt {
    /// The optional atomic-orbital overlap matrix, stored row by row.
    #[serde(default)]
    pub overlap: Option<Vec<Vec<f64>>>,
}

// =================
// Trait definitions
// =================

/// Trait for data sources exposing the TREXIO groups required for overlap checking.
pub trait TrexioSource {
    /// A human-readable name for this source, typically its path.
    fn name(&self) -> String;

    /// Checks if the one-electron atomic-orbital overlap integrals are present.
    fn has_ao_1e_int_overlap(&self) -> Result<bool, anyhow::Error>;

    /// Reads the `nucleus` group.
    fn read_nucleus(&self) -> Result<TrexioNucleus, anyhow::Error>;

    /// Reads the `basis` group.
    fn read_basis(&self) -> Result<TrexioBasis, anyhow::Error>;

    /// Reads the `ao` group.
    fn read_ao(&self) -> Result<TrexioAo, anyhow::Error>;

    /// Reads the stored one-electron atomic-orbital overlap matrix.
    fn read_ao_1e_int_overlap(&self) -> Result<Array2<f64>, anyhow::Error>;
}

// ===============================
// Atomic-orbital basis descriptor
// ===============================

/// Structure describing an atomic-orbital basis as read from a TREXIO source: the basis type
/// tag, the nuclei on which the shells are centred, and the raw shell and atomic-orbital tables.
#[derive(Clone, Debug)]
pub struct TrexioAoBasis {
    /// The type of the basis set.
    pub kind: BasisKind,

    /// The nuclei on which the shells are centred.
    pub nuclei: NucleusSet,

    /// The raw `basis` group.
    pub basis: TrexioBasis,

    /// The raw `ao` group.
    pub ao: TrexioAo,
}

impl TrexioAoBasis {
    /// Reads the atomic-orbital basis descriptor from a TREXIO source.
    ///
    /// # Errors
    ///
    /// Errors if any of the groups cannot be read or if the basis type is not recognised.
    pub fn read(source: &dyn TrexioSource) -> Result<Self, anyhow::Error> {
        let nuclei = NucleusSet::from_trexio(
            &source
                .read_nucleus()
                .with_context(|| format!("Unable to read nuclei from `{}`", source.name()))?,
        )?;
        let basis = source
            .read_basis()
            .with_context(|| format!("Unable to read the basis from `{}`", source.name()))?;
        let kind = basis.basis_type.parse::<BasisKind>()?;
        let ao = source.read_ao().with_context(|| {
            format!(
                "Unable to read atomic-orbital information from `{}`",
                source.name()
            )
        })?;
        Ok(Self {
            kind,
            nuclei,
            basis,
            ao,
        })
    }

    /// The number of atomic orbitals.
    pub fn ao_num(&self) -> usize {
        self.ao.num
    }
}

// ================
// In-memory source
// ================

/// A TREXIO source held entirely in memory. This is also the serialised form of YAML-based
/// TREXIO files.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InMemoryTrexio {
    /// The name of this source.
    #[serde(skip)]
    pub name: String,

    /// The `nucleus` group.
    pub nucleus: TrexioNucleus,

    /// The `basis` group.
    pub basis: TrexioBasis,

    /// The `ao` group.
    pub ao: TrexioAo,

    /// The `ao_1e_int` group.
    #[serde(default)]
    pub ao_1e_int: TrexioAo1eInt,
}

impl InMemoryTrexio {
    /// Reads a YAML-serialised TREXIO file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let mut trexio: InMemoryTrexio = read_aocheck_yaml(&path).with_context(|| {
            format!(
                "Unable to read `{}` as a YAML TREXIO file",
                path.as_ref().display()
            )
        })?;
        trexio.name = path.as_ref().display().to_string();
        Ok(trexio)
    }
}

impl TrexioSource for InMemoryTrexio {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn has_ao_1e_int_overlap(&self) -> Result<bool, anyhow::Error> {
        Ok(self.ao_1e_int.overlap.is_some())
    }

    fn read_nucleus(&self) -> Result<TrexioNucleus, anyhow::Error> {
        Ok(self.nucleus.clone())
    }

    fn read_basis(&self) -> Result<TrexioBasis, anyhow::Error> {
        Ok(self.basis.clone())
    }

    fn read_ao(&self) -> Result<TrexioAo, anyhow::Error> {
        Ok(self.ao.clone())
    }

    fn read_ao_1e_int_overlap(&self) -> Result<Array2<f64>, anyhow::Error> {
        let rows = self
            .ao_1e_int
            .overlap
            .as_ref()
            .ok_or_else(|| format_err!("No `ao_1e_int.overlap` found in `{}`.", self.name))?;
        rows_to_array2(rows)
    }
}

/// Converts a row-by-row matrix into an [`Array2`].
///
/// # Errors
///
/// Errors if the rows have unequal lengths.
pub(crate) fn rows_to_array2(rows: &[Vec<f64>]) -> Result<Array2<f64>, anyhow::Error> {
    let nrows = rows.len();
    let ncols = rows.first().map(|row| row.len()).unwrap_or(0);
    ensure!(
        rows.iter().all(|row| row.len() == ncols),
        "Rows of unequal lengths found in matrix."
    );
    let flat = rows.iter().flatten().copied().collect::<Vec<_>>();
    Array2::from_shape_vec((nrows, ncols), flat).map_err(|err| format_err!(err))
}

// ==================
// Source dispatching
// ==================

/// Opens a TREXIO source, choosing the backend from the file extension: `.yml`/`.yaml` files are
/// read as YAML-serialised TREXIO data, and `.h5`/`.hdf5` files are read with the TREXIO HDF5
/// layout (requires the `trexio-hdf5` feature).
///
/// # Arguments
///
/// * `path` - The path to the TREXIO file.
pub fn open_trexio<P: AsRef<Path>>(path: P) -> Result<Box<dyn TrexioSource>, anyhow::Error> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "yml" | "yaml" => Ok(Box::new(InMemoryTrexio::from_yaml(&path)?)),
        #[cfg(feature = "trexio-hdf5")]
        "h5" | "hdf5" => Ok(Box::new(hdf5::TrexioH5File::open(&path)?)),
        #[cfg(not(feature = "trexio-hdf5"))]
        "h5" | "hdf5" => bail!(
            "`{}` is an HDF5 file, but `aocheck` has been built without the `trexio-hdf5` feature.",
            path.display()
        ),
        _ => bail!(
            "Unable to determine the TREXIO backend for `{}` from its extension.",
            path.display()
        ),
    }
}
