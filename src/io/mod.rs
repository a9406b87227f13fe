//! Reading and writing `aocheck` files.
//!
//! Overlap-check results are persisted with `bincode`. Configuration files and YAML-serialised
//! TREXIO data are read with `serde_yaml`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{self, Context};
use bincode;
use serde::{de::DeserializeOwned, Serialize};
use serde_yaml;

pub(crate) mod format;


/// File types written by `aocheck`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AoCheckFileType {
    /// Binary file holding an overlap-check result.
    Ovl,
}

impl AoCheckFileType {
    /// The extension appended to file names of this type.
    pub fn ext(self) -> &'static str {
        match self {
            AoCheckFileType::Ovl => "aocheck.ovl",
        }
    }

    /// The full path of a file of this type with base name `name`.
    pub fn path<P: AsRef<Path>>(self, name: P) -> PathBuf {
        let mut path = name.as_ref().to_path_buf();
        path.set_extension(self.ext());
        path
    }
}

/// Reads an `aocheck` binary file of type `file_type` with base name `name`.
pub fn read_aocheck_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: AoCheckFileType,
) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let path = file_type.path(name);
    let file = File::open(&path)
        .with_context(|| format!("Unable to open `{}` for reading", path.display()))?;
    bincode::deserialize_from(BufReader::new(file))
        .with_context(|| format!("Unable to deserialise `{}`", path.display()))
}

/// Writes `value` into an `aocheck` binary file of type `file_type` with base name `name`.
/// Any existing file is overwritten.
pub fn write_aocheck_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: AoCheckFileType,
    value: &T,
) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let path = file_type.path(name);
    let file = File::create(&path)
        .with_context(|| format!("Unable to create `{}`", path.display()))?;
    bincode::serialize_into(BufWriter::new(file), value)
        .with_context(|| format!("Unable to serialise into `{}`", path.display()))
}

/// Reads a YAML file, given with its extension, into a structure.
pub fn read_aocheck_yaml<T, P: AsRef<Path>>(path: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Unable to open `{}`", path.display()))?;
    serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("`{}` is not valid YAML for this structure", path.display()))
}
