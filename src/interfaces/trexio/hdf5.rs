//! Reading TREXIO files with the HDF5 back end.
//!
//! Each TREXIO group is an HDF5 group of the same name. Scalar and string fields are stored as
//! attributes of the group, and array fields as datasets in the group, both named
//! `<group>_<field>`.

use std::path::Path;

use anyhow::{self, format_err, Context};
use hdf5::types::{FixedAscii, VarLenAscii, VarLenUnicode};
use hdf5::{self, H5Type};
use ndarray::Array2;

use crate::interfaces::trexio::{TrexioAo, TrexioBasis, TrexioNucleus, TrexioSource};

#[cfg(test)]
#[path = "hdf5_tests.rs"]
mod hdf5_tests;

/// A TREXIO file in the HDF5 format, opened read-only.
pub struct TrexioH5File {
    name: String,
    f: hdf5::File,
}

impl TrexioH5File {
    /// Opens a TREXIO HDF5 file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let name = path.as_ref().display().to_string();
        let f = hdf5::File::open(&path)
            .with_context(|| format!("Unable to open `{name}` as an HDF5 file"))?;
        Ok(Self { name, f })
    }

    fn group(&self, group: &str) -> Result<hdf5::Group, anyhow::Error> {
        self.f
            .group(group)
            .with_context(|| format!("Group `{group}` not found in `{}`", self.name))
    }

    fn read_attr_scalar<T: H5Type>(&self, group: &str, field: &str) -> Result<T, anyhow::Error> {
        let attr_name = format!("{group}_{field}");
        self.group(group)?
            .attr(&attr_name)
            .and_then(|attr| attr.read_scalar::<T>())
            .with_context(|| format!("Unable to read `{group}.{field}` from `{}`", self.name))
    }

    fn read_attr_string(&self, group: &str, field: &str) -> Result<String, anyhow::Error> {
        let attr_name = format!("{group}_{field}");
        let attr = self
            .group(group)?
            .attr(&attr_name)
            .with_context(|| format!("Unable to find `{group}.{field}` in `{}`", self.name))?;
        attr.read_scalar::<VarLenUnicode>()
            .map(|s| s.as_str().to_string())
            .or_else(|_| attr.read_scalar::<VarLenAscii>().map(|s| s.as_str().to_string()))
            .or_else(|_| {
                attr.read_scalar::<FixedAscii<128>>()
                    .map(|s| s.as_str().to_string())
            })
            .with_context(|| {
                format!("Unable to read `{group}.{field}` as a string from `{}`", self.name)
            })
    }

    fn has_attr(&self, group: &str, field: &str) -> bool {
        self.f
            .group(group)
            .map(|g| g.attr_names().map_or(false, |names| {
                names.iter().any(|name| *name == format!("{group}_{field}"))
            }))
            .unwrap_or(false)
    }

    fn has_dataset(&self, group: &str, field: &str) -> bool {
        self.f.link_exists(group)
            && self
                .f
                .group(group)
                .map(|g| g.link_exists(&format!("{group}_{field}")))
                .unwrap_or(false)
    }

    fn dataset(&self, group: &str, field: &str) -> Result<hdf5::Dataset, anyhow::Error> {
        self.group(group)?
            .dataset(&format!("{group}_{field}"))
            .with_context(|| format!("Dataset `{group}.{field}` not found in `{}`", self.name))
    }

    fn read_1d<T: H5Type>(&self, group: &str, field: &str) -> Result<Vec<T>, anyhow::Error> {
        Ok(self.dataset(group, field)?.read_raw::<T>()?)
    }

    /// Reads a one-dimensional string dataset. TREXIO writes C strings, which are stored with the
    /// ASCII character set, but UTF-8 and fixed-length strings are also accepted.
    fn read_1d_strings(&self, group: &str, field: &str) -> Result<Vec<String>, anyhow::Error> {
        let dataset = self.dataset(group, field)?;
        dataset
            .read_raw::<VarLenAscii>()
            .map(|ss| ss.iter().map(|s| s.as_str().to_string()).collect::<Vec<_>>())
            .or_else(|_| {
                dataset
                    .read_raw::<VarLenUnicode>()
                    .map(|ss| ss.iter().map(|s| s.as_str().to_string()).collect::<Vec<_>>())
            })
            .or_else(|_| {
                dataset
                    .read_raw::<FixedAscii<128>>()
                    .map(|ss| ss.iter().map(|s| s.as_str().to_string()).collect::<Vec<_>>())
            })
            .with_context(|| {
                format!("Unable to read `{group}.{field}` as strings from `{}`", self.name)
            })
    }

    fn read_2d<T: H5Type>(&self, group: &str, field: &str) -> Result<Array2<T>, anyhow::Error> {
        self.dataset(group, field)?
            .read_2d::<T>()
            .with_context(|| format!("Unable to read `{group}.{field}` as a matrix"))
    }
}

impl TrexioSource for TrexioH5File {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn has_ao_1e_int_overlap(&self) -> Result<bool, anyhow::Error> {
        Ok(self.has_dataset("ao_1e_int", "overlap"))
    }

    fn read_nucleus(&self) -> Result<TrexioNucleus, anyhow::Error> {
        let num = usize::try_from(self.read_attr_scalar::<i64>("nucleus", "num")?)
            .map_err(|err| format_err!(err))?;
        let coord = self
            .read_2d::<f64>("nucleus", "coord")?
            .rows()
            .into_iter()
            .map(|row| {
                if row.len() == 3 {
                    Ok([row[0], row[1], row[2]])
                } else {
                    Err(format_err!(
                        "`nucleus.coord` has rows of length {}, but 3 is expected.",
                        row.len()
                    ))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let charge = if self.has_dataset("nucleus", "charge") {
            Some(self.read_1d::<f64>("nucleus", "charge")?)
        } else {
            None
        };
        let label = if self.has_dataset("nucleus", "label") {
            Some(self.read_1d_strings("nucleus", "label")?)
        } else {
            None
        };
        Ok(TrexioNucleus {
            num,
            coord,
            charge,
            label,
        })
    }

    fn read_basis(&self) -> Result<TrexioBasis, anyhow::Error> {
        let to_usize = |v: i64| usize::try_from(v).map_err(|err| format_err!(err));
        let to_indices = |vs: Vec<i64>| {
            vs.into_iter()
                .map(to_usize)
                .collect::<Result<Vec<_>, _>>()
        };
        let r_power = if self.has_dataset("basis", "r_power") {
            Some(
                self.read_1d::<i64>("basis", "r_power")?
                    .into_iter()
                    .map(|r| i32::try_from(r).map_err(|err| format_err!(err)))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        } else {
            None
        };
        Ok(TrexioBasis {
            basis_type: self.read_attr_string("basis", "type")?,
            shell_num: to_usize(self.read_attr_scalar::<i64>("basis", "shell_num")?)?,
            prim_num: to_usize(self.read_attr_scalar::<i64>("basis", "prim_num")?)?,
            nucleus_index: to_indices(self.read_1d::<i64>("basis", "nucleus_index")?)?,
            shell_ang_mom: self
                .read_1d::<i64>("basis", "shell_ang_mom")?
                .into_iter()
                .map(|l| u32::try_from(l).map_err(|err| format_err!(err)))
                .collect::<Result<Vec<_>, _>>()?,
            shell_factor: self.read_1d::<f64>("basis", "shell_factor")?,
            r_power,
            shell_index: to_indices(self.read_1d::<i64>("basis", "shell_index")?)?,
            exponent: self.read_1d::<f64>("basis", "exponent")?,
            coefficient: self.read_1d::<f64>("basis", "coefficient")?,
            prim_factor: self.read_1d::<f64>("basis", "prim_factor")?,
        })
    }

    fn read_ao(&self) -> Result<TrexioAo, anyhow::Error> {
        let cartesian = if self.has_attr("ao", "cartesian") {
            i32::try_from(self.read_attr_scalar::<i64>("ao", "cartesian")?)
                .map_err(|err| format_err!(err))?
        } else {
            0
        };
        Ok(TrexioAo {
            cartesian,
            num: usize::try_from(self.read_attr_scalar::<i64>("ao", "num")?)
                .map_err(|err| format_err!(err))?,
            shell: self
                .read_1d::<i64>("ao", "shell")?
                .into_iter()
                .map(|i| usize::try_from(i).map_err(|err| format_err!(err)))
                .collect::<Result<Vec<_>, _>>()?,
            normalization: self.read_1d::<f64>("ao", "normalization")?,
        })
    }

    fn read_ao_1e_int_overlap(&self) -> Result<Array2<f64>, anyhow::Error> {
        self.read_2d::<f64>("ao_1e_int", "overlap")
    }
}
