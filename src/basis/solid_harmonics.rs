//! Real regular solid harmonics expressed as polynomials of Cartesian coordinates.

use std::collections::BTreeMap;

use factorial::Factorial;
use ndarray::{Array1, ArrayView1};
use num::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::basis::ao::{BasisShell, ShellOrder};

#[cfg(test)]
#[path = "solid_harmonics_tests.rs"]
mod solid_harmonics_tests;

const POLYNOMIAL_COEFF_THRESH: f64 = 1e-14;

/// Calculates the number of combinations of `n` things taken `r` at a time (unsigned arguments).
///
/// If $`r > n`$, `0` is returned.
fn combu(nu: u32, ru: u32) -> BigUint {
    if ru > nu {
        BigUint::zero()
    } else {
        (nu - ru + 1..=nu).product::<BigUint>()
            / BigUint::from(ru)
                .checked_factorial()
                .unwrap_or_else(|| panic!("Unable to compute the factorial of {ru}."))
    }
}

/// Converts a big unsigned integer to `f64`.
fn big_to_f64(n: &BigUint) -> f64 {
    n.to_f64()
        .unwrap_or_else(|| panic!("Unable to convert `{n}` to `f64`."))
}

/// Computes $`n!`$ as `f64`.
fn fact_f64(n: u32) -> f64 {
    big_to_f64(
        &BigUint::from(n)
            .checked_factorial()
            .unwrap_or_else(|| panic!("Unable to compute the factorial of {n}.")),
    )
}

// ==================
// Struct definitions
// ==================

/// A polynomial in the Cartesian components $`x`$, $`y`$, $`z`$ of a displacement vector from
/// a shell centre.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AngularPolynomial {
    /// Terms of the polynomial, each given by the exponent tuple $`(l_x, l_y, l_z)`$ and its
    /// coefficient.
    terms: Vec<((u32, u32, u32), f64)>,
}

impl AngularPolynomial {
    /// Constructs the single Cartesian monomial $`x^{l_x} y^{l_y} z^{l_z}`$.
    pub(crate) fn monomial(cart_tuple: (u32, u32, u32)) -> Self {
        Self {
            terms: vec![(cart_tuple, 1.0)],
        }
    }

    /// Constructs the real regular solid harmonic $`S_{lm}`$ in Racah normalisation, so that
    /// $`S_{10} = z`$, $`S_{11} = x`$, $`S_{1,-1} = y`$.
    ///
    /// The expansion follows
    ///
    /// ```math
    ///     S_{lm} = N_{lm} \sum_{t=0}^{\lfloor (l - |m|)/2 \rfloor} \sum_{u=0}^{t} \sum_{v}
    ///         C^{lm}_{tuv} x^{2t + |m| - 2(u + v)} y^{2(u + v)} z^{l - 2t - |m|},
    /// ```
    ///
    /// where $`v`$ runs over integers for $`m \ge 0`$ and over half-integers for $`m < 0`$.
    ///
    /// # Arguments
    ///
    /// * `l` - The rank of the solid harmonic.
    /// * `m` - The order of the solid harmonic, satisfying $`|m| \le l`$.
    ///
    /// # Panics
    ///
    /// Panics if $`|m| > l`$.
    pub(crate) fn real_solid_harmonic(l: u32, m: i32) -> Self {
        let absm = m.unsigned_abs();
        assert!(absm <= l, "|m| = {absm} exceeds l = {l}.");
        let twovm = u32::from(m < 0);
        let kmax = if m < 0 { (absm - 1) / 2 } else { absm / 2 };

        let delta_m0 = if m == 0 { 2.0 } else { 1.0 };
        let norm = (2.0 * fact_f64(l + absm) * fact_f64(l - absm) / delta_m0).sqrt()
            / (2.0_f64.powi(absm as i32) * fact_f64(l));

        let mut terms: BTreeMap<(u32, u32, u32), f64> = BTreeMap::new();
        for t in 0..=((l - absm) / 2) {
            for u in 0..=t {
                for k in 0..=kmax {
                    let twov = 2 * k + twovm;
                    let sign = if (t + k) % 2 == 0 { 1.0 } else { -1.0 };
                    let c = sign
                        * 0.25_f64.powi(t as i32)
                        * big_to_f64(&combu(l, t))
                        * big_to_f64(&combu(l - t, absm + t))
                        * big_to_f64(&combu(t, u))
                        * big_to_f64(&combu(absm, twov));
                    let lx = 2 * t + absm - 2 * u - twov;
                    let ly = 2 * u + twov;
                    let lz = l - 2 * t - absm;
                    *terms.entry((lx, ly, lz)).or_insert(0.0) += norm * c;
                }
            }
        }
        Self {
            terms: terms
                .into_iter()
                .filter(|(_, c)| c.abs() > POLYNOMIAL_COEFF_THRESH)
                .collect(),
        }
    }

    /// Constructs the angular polynomials for all functions in a shell, in shell order.
    pub(crate) fn for_shell(basis_shell: &BasisShell) -> Vec<Self> {
        match &basis_shell.shell_order {
            ShellOrder::Cart(cart_order) => cart_order
                .iter()
                .map(|cart_tuple| Self::monomial(*cart_tuple))
                .collect(),
            ShellOrder::Pure(pure_order) => pure_order
                .iter()
                .map(|m| Self::real_solid_harmonic(pure_order.lpure, *m))
                .collect(),
        }
    }

    /// Evaluates this polynomial at a single displacement.
    pub(crate) fn eval(&self, x: f64, y: f64, z: f64) -> f64 {
        self.terms
            .iter()
            .map(|((lx, ly, lz), c)| {
                c * x.powi(*lx as i32) * y.powi(*ly as i32) * z.powi(*lz as i32)
            })
            .sum()
    }

    /// Evaluates this polynomial at many displacements given component-wise.
    pub(crate) fn eval_many(
        &self,
        xs: &ArrayView1<f64>,
        ys: &ArrayView1<f64>,
        zs: &ArrayView1<f64>,
    ) -> Array1<f64> {
        self.terms.iter().fold(
            Array1::<f64>::zeros(xs.len()),
            |acc, ((lx, ly, lz), c)| {
                let (lx, ly, lz) = (*lx as i32, *ly as i32, *lz as i32);
                acc + xs.mapv(|x| x.powi(lx)) * ys.mapv(|y| y.powi(ly)) * zs.mapv(|z| z.powi(lz))
                    * *c
            },
        )
    }
}
