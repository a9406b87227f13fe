//! # aocheck: Numerical Checks of Atomic-Orbital Overlap Integrals
//!
//! `aocheck` validates the atomic-orbital overlap integrals stored in a
//! [TREXIO](https://github.com/TREX-CoE/trexio) data container by recomputing them with
//! brute-force quadrature on a uniform Cartesian grid and comparing the result against the stored
//! matrix. Its capabilities are:
//! - reading the `nucleus`, `basis`, `ao`, and `ao_1e_int` groups of TREXIO files, either
//!   YAML-serialised or in the HDF5 layout,
//! - evaluating contracted Gaussian atomic orbitals with Cartesian or real solid-harmonic angular
//!   parts in TREXIO order,
//! - building a grid over the bounding box of the nuclei padded by a fixed margin,
//! - computing the overlap matrix by whole-grid (batch) or point-by-point (pointwise) evaluation,
//!   and
//! - reporting the computed and reference values of every atomic-orbital pair together with the
//!   Frobenius norm of their difference.
//!
//! This documentation details the public API of the `aocheck` crate.
//!
//! ## Getting started
//!
//! The available features defined by this crate are:
//! - `trexio-hdf5`: Enables TREXIO files in the HDF5 format to be read in. This builds the HDF5 C
//!   library and links statically, which requires `cmake` and `gcc`.
//!
//! The `aocheck` binary takes a TREXIO file and, optionally, a YAML configuration file:
//!
//! ```text
//! aocheck water.yml -n 60 -e pointwise -o water.out
//! ```
//!
//! ## Examples and usage
//!
//! For most items (structs, enums, functions, and traits), their usages are illustrated in test
//! functions.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod auxiliary;
pub mod basis;
pub mod drivers;
pub mod evaluator;
pub mod grid;
pub mod interfaces;
pub mod io;
