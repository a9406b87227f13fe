//! Angular parts of atomic-orbital shells.

use std::collections::HashSet;
use std::fmt;
use std::slice::Iter;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "ao_tests.rs"]
mod ao_tests;

// -------------------
// Shell order structs
// -------------------

// ~~~~~~~~~
// PureOrder
// ~~~~~~~~~

/// Structure to contain information about the ordering of pure Gaussians of a certain rank.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PureOrder {
    /// A sequence of $`m_l`$ values giving the ordering of the pure Gaussians.
    mls: Vec<i32>,

    /// The rank of the pure Gaussians.
    pub lpure: u32,
}

impl PureOrder {
    /// Constructs a new [`PureOrder`] structure for a specified rank with the TREXIO order
    /// $`0, +1, -1, +2, -2, \ldots, +l, -l`$. This is the same as the Molden order.
    ///
    /// # Arguments
    ///
    /// * `lpure` - The required pure Gaussian rank.
    #[must_use]
    pub fn trexio(lpure: u32) -> Self {
        let mls = (0..=lpure)
            .flat_map(|absm| {
                let absm = absm as i32;
                if absm == 0 {
                    vec![0]
                } else {
                    vec![absm, -absm]
                }
            })
            .collect_vec();
        Self { mls, lpure }
    }

    /// Verifies if this [`PureOrder`] struct is valid.
    #[must_use]
    pub fn verify(&self) -> bool {
        let mls_set = self.mls.iter().collect::<HashSet<_>>();
        let lpure = self.lpure;
        mls_set.len() == self.ncomps()
            && self.mls.len() == self.ncomps()
            && mls_set.iter().all(|m| m.unsigned_abs() <= lpure)
    }

    /// Iterates over the constituent $`m_l`$ values.
    pub fn iter(&'_ self) -> Iter<'_, i32> {
        self.mls.iter()
    }

    /// Returns the number of pure components in the shell.
    pub fn ncomps(&self) -> usize {
        2 * self.lpure as usize + 1
    }
}

impl fmt::Debug for PureOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PureOrder(l = {}; {})",
            self.lpure,
            self.mls.iter().map(|m| format!("{m:+}")).join(", ")
        )
    }
}

// ~~~~~~~~~
// CartOrder
// ~~~~~~~~~

/// Structure to contain information about the ordering of Cartesian Gaussians of a certain rank.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartOrder {
    /// A sequence of $`(l_x, l_y, l_z)`$ tuples giving the ordering of the Cartesian Gaussians.
    pub cart_tuples: Vec<(u32, u32, u32)>,

    /// The rank of the Cartesian Gaussians.
    pub lcart: u32,
}

impl CartOrder {
    /// Constructs a new [`CartOrder`] structure for a specified rank with lexicographic order,
    /// which is the order used by TREXIO (*e.g.* `xx, xy, xz, yy, yz, zz`).
    ///
    /// # Arguments
    ///
    /// * `lcart` - The required Cartesian Gaussian rank.
    #[must_use]
    pub fn lex(lcart: u32) -> Self {
        let mut cart_tuples =
            Vec::with_capacity(((lcart + 1) * (lcart + 2)).div_euclid(2) as usize);
        for lx in (0..=lcart).rev() {
            for ly in (0..=(lcart - lx)).rev() {
                cart_tuples.push((lx, ly, lcart - lx - ly));
            }
        }
        Self { cart_tuples, lcart }
    }

    /// Verifies if this [`CartOrder`] struct is valid.
    #[must_use]
    pub fn verify(&self) -> bool {
        let cart_tuples_set = self.cart_tuples.iter().collect::<HashSet<_>>();
        let lcart = self.lcart;
        cart_tuples_set.len() == self.ncomps()
            && self.cart_tuples.len() == self.ncomps()
            && cart_tuples_set
                .iter()
                .all(|(lx, ly, lz)| lx + ly + lz == lcart)
    }

    /// Iterates over the constituent tuples.
    pub fn iter(&'_ self) -> Iter<'_, (u32, u32, u32)> {
        self.cart_tuples.iter()
    }

    /// Returns the number of Cartesian components in the shell.
    pub fn ncomps(&self) -> usize {
        let lcart = self.lcart as usize;
        ((lcart + 1) * (lcart + 2)).div_euclid(2)
    }
}

impl fmt::Debug for CartOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CartOrder(l = {}; {})",
            self.lcart,
            self.cart_tuples
                .iter()
                .map(|cart_tuple| cart_tuple_to_str(cart_tuple))
                .join(", ")
        )
    }
}

/// Translates a Cartesian exponent tuple to a flat string (*e.g.* `xxyz` for $`(2, 1, 1)`$).
pub(crate) fn cart_tuple_to_str(cart_tuple: &(u32, u32, u32)) -> String {
    if cart_tuple.0 + cart_tuple.1 + cart_tuple.2 == 0u32 {
        "1".to_string()
    } else {
        ["x", "y", "z"]
            .iter()
            .zip([cart_tuple.0, cart_tuple.1, cart_tuple.2])
            .map(|(cart, l)| cart.repeat(l as usize))
            .collect::<String>()
    }
}

// ----------
// ShellOrder
// ----------

/// Enumerated type to indicate the type of the angular functions in a shell and how they are
/// ordered.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ShellOrder {
    /// The angular functions are real solid harmonics in the order given by the associated
    /// [`PureOrder`].
    Pure(PureOrder),

    /// The angular functions are Cartesian monomials in the order given by the associated
    /// [`CartOrder`].
    Cart(CartOrder),
}

impl fmt::Display for ShellOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellOrder::Pure(pure_order) => write!(
                f,
                "Pure ({})",
                pure_order.iter().map(|m| m.to_string()).join(", ")
            ),
            ShellOrder::Cart(cart_order) => write!(
                f,
                "Cart ({})",
                cart_order
                    .iter()
                    .map(|cart_tuple| cart_tuple_to_str(cart_tuple))
                    .join(", ")
            ),
        }
    }
}

// ----------
// BasisShell
// ----------

/// Structure representing the angular information of a shell in an atomic-orbital basis set.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BasisShell {
    /// A non-negative integer indicating the rank of the shell. If this shell is pure, the rank
    /// equals its angular momentum. If this shell is Cartesian, the rank is the sum of the
    /// exponents of the Cartesian coordinates.
    pub l: u32,

    /// An enum indicating the type of the angular functions in a shell and how they are ordered.
    pub shell_order: ShellOrder,
}

impl BasisShell {
    /// Constructs a new TREXIO-ordered [`BasisShell`] of rank `l`.
    ///
    /// # Arguments
    ///
    /// * `l` - The rank of this shell.
    /// * `cart` - If `true`, the shell consists of lexicographically ordered Cartesian functions;
    /// otherwise, it consists of real solid harmonics in the TREXIO order.
    pub fn trexio(l: u32, cart: bool) -> Self {
        let shell_order = if cart {
            ShellOrder::Cart(CartOrder::lex(l))
        } else {
            ShellOrder::Pure(PureOrder::trexio(l))
        };
        BasisShell { l, shell_order }
    }

    /// The number of basis functions in this shell.
    pub fn n_funcs(&self) -> usize {
        let lsize = self.l as usize;
        match self.shell_order {
            ShellOrder::Pure(_) => 2 * lsize + 1,
            ShellOrder::Cart(_) => ((lsize + 1) * (lsize + 2)).div_euclid(2),
        }
    }
}
