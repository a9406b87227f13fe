use std::f64::consts::PI;

use approx;
use nalgebra::Point3;
use ndarray::array;

use crate::auxiliary::nucleus::NucleusSet;
use crate::basis::gaussian::{BasisSet, BasisSetError};
use crate::basis::BasisKind;
use crate::interfaces::trexio::{TrexioAo, TrexioAoBasis, TrexioBasis};

/// An $`s`$ shell on the first nucleus and a $`p`$ shell on the second nucleus.
fn sp_basis(cartesian: i32) -> TrexioAoBasis {
    let alpha_s = 0.8_f64;
    let alpha_p = 0.5_f64;
    TrexioAoBasis {
        kind: BasisKind::Gaussian,
        nuclei: NucleusSet::new(&[Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0)]),
        basis: TrexioBasis {
            basis_type: "Gaussian".to_string(),
            shell_num: 2,
            prim_num: 2,
            nucleus_index: vec![0, 1],
            shell_ang_mom: vec![0, 1],
            shell_factor: vec![1.0, 1.0],
            r_power: None,
            shell_index: vec![0, 1],
            exponent: vec![alpha_s, alpha_p],
            coefficient: vec![1.0, 1.0],
            prim_factor: vec![
                (2.0 * alpha_s / PI).powf(0.75),
                (2.0 * alpha_p / PI).powf(0.75) * 2.0 * alpha_p.sqrt(),
            ],
        },
        ao: TrexioAo {
            cartesian,
            num: 4,
            shell: vec![0, 1, 1, 1],
            normalization: vec![1.0; 4],
        },
    }
}

#[test]
fn test_basis_set_from_trexio_sp() {
    let basis_set = BasisSet::from_trexio(&sp_basis(0)).unwrap();
    assert_eq!(basis_set.n_shells(), 2);
    assert_eq!(basis_set.n_funcs(), 4);
    assert_eq!(basis_set.shell_boundaries(), &vec![(0, 1), (1, 4)]);

    let (x, y, z) = (0.3_f64, -0.4_f64, 0.2_f64);
    let values = basis_set.value_at(&Point3::new(x, y, z));

    let r2_s = x * x + y * y + z * z;
    let s_expected = (1.6_f64 / PI).powf(0.75) * (-0.8 * r2_s).exp();
    approx::assert_relative_eq!(values[0], s_expected, epsilon = 1e-12);

    // Relative to the second nucleus, with pure order z, x, y.
    let dz = z - 1.0;
    let r2_p = x * x + y * y + dz * dz;
    let np = (1.0_f64 / PI).powf(0.75) * 2.0 * 0.5_f64.sqrt();
    let radial = np * (-0.5 * r2_p).exp();
    approx::assert_relative_eq!(values[1], dz * radial, epsilon = 1e-12);
    approx::assert_relative_eq!(values[2], x * radial, epsilon = 1e-12);
    approx::assert_relative_eq!(values[3], y * radial, epsilon = 1e-12);
}

#[test]
fn test_basis_set_cartesian_p_order() {
    let basis_set = BasisSet::from_trexio(&sp_basis(1)).unwrap();
    let (x, y, z) = (0.3_f64, -0.4_f64, 1.2_f64);
    let values = basis_set.value_at(&Point3::new(x, y, z));
    let dz = z - 1.0;
    let ratio_xz = values[1] / values[3];
    let ratio_yz = values[2] / values[3];
    approx::assert_relative_eq!(ratio_xz, x / dz, epsilon = 1e-10);
    approx::assert_relative_eq!(ratio_yz, y / dz, epsilon = 1e-10);
}

#[test]
fn test_basis_set_values_at_matches_value_at() {
    let basis_set = BasisSet::from_trexio(&sp_basis(0)).unwrap();
    let points = array![
        [0.0, 0.0, 0.0],
        [0.5, -0.5, 1.0],
        [1.5, 2.0, -0.3],
        [-1.0, 0.1, 0.9]
    ];
    let many = basis_set.values_at(&points.view());
    assert_eq!(many.dim(), (4, 4));
    for (row, point) in many.rows().into_iter().zip(points.rows()) {
        let single = basis_set.value_at(&Point3::new(point[0], point[1], point[2]));
        for (a, b) in row.iter().zip(single.iter()) {
            approx::assert_relative_eq!(*a, *b, epsilon = 1e-14);
        }
    }
}

#[test]
fn test_basis_set_r_power_and_factors() {
    let mut ao_basis = sp_basis(0);
    ao_basis.basis.r_power = Some(vec![2, 0]);
    ao_basis.basis.shell_factor = vec![3.0, 1.0];
    ao_basis.ao.normalization = vec![0.5, 1.0, 1.0, 1.0];
    let plain = BasisSet::from_trexio(&sp_basis(0)).unwrap();
    let scaled = BasisSet::from_trexio(&ao_basis).unwrap();
    let point = Point3::new(0.2, 0.7, -0.1);
    let r2 = 0.2 * 0.2 + 0.7 * 0.7 + 0.1 * 0.1;
    approx::assert_relative_eq!(
        scaled.value_at(&point)[0],
        1.5 * r2 * plain.value_at(&point)[0],
        epsilon = 1e-12
    );
}

#[test]
fn test_basis_set_non_gaussian() {
    let mut ao_basis = sp_basis(0);
    ao_basis.kind = BasisKind::Slater;
    let err = BasisSet::from_trexio(&ao_basis).unwrap_err();
    assert_eq!(
        err.downcast_ref::<BasisSetError>(),
        Some(&BasisSetError::NonGaussianBasis(BasisKind::Slater))
    );
}

#[test]
fn test_basis_set_inconsistent() {
    // Too few atomic orbitals for the p shell.
    let mut ao_basis = sp_basis(0);
    ao_basis.ao.num = 3;
    ao_basis.ao.shell = vec![0, 1, 1];
    ao_basis.ao.normalization = vec![1.0; 3];
    let err = BasisSet::from_trexio(&ao_basis).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BasisSetError>(),
        Some(BasisSetError::InconsistentData(_))
    ));

    // Non-contiguous atomic orbitals.
    let mut ao_basis = sp_basis(0);
    ao_basis.ao.shell = vec![1, 0, 1, 1];
    assert!(BasisSet::from_trexio(&ao_basis).is_err());

    // Shell centred on a missing nucleus.
    let mut ao_basis = sp_basis(0);
    ao_basis.basis.nucleus_index = vec![0, 2];
    assert!(BasisSet::from_trexio(&ao_basis).is_err());

    // Primitive arrays of the wrong length.
    let mut ao_basis = sp_basis(0);
    ao_basis.basis.exponent.push(1.0);
    assert!(BasisSet::from_trexio(&ao_basis).is_err());
}

#[test]
fn test_basis_set_negative_r_power() {
    let mut ao_basis = sp_basis(0);
    ao_basis.basis.r_power = Some(vec![-1, 0]);
    let err = BasisSet::from_trexio(&ao_basis).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BasisSetError>(),
        Some(BasisSetError::InconsistentData(_))
    ));

    ao_basis.basis.r_power = Some(vec![1, 0]);
    let basis_set = BasisSet::from_trexio(&ao_basis).unwrap();
    let at_nucleus = basis_set.value_at(&Point3::origin());
    assert!(at_nucleus.iter().all(|v| v.is_finite()));
    approx::assert_abs_diff_eq!(at_nucleus[0], 0.0);
}
