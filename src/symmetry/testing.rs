/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Structures and force constant models shared by unit tests.

use crate::blocks::{self, Dynmat};

use phonsym_array_types::{V3, M33};
use phonsym_structure::{Structure, Lattice, CoordsKind};

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;

pub fn simple_cubic() -> Structure
{ Structure::new(Lattice::eye(), CoordsKind::Fracs(vec![V3::zero()]), vec!["X"]) }

pub fn cscl() -> Structure
{
    Structure::new(
        Lattice::cubic(4.1),
        CoordsKind::Fracs(vec![V3([0.0, 0.0, 0.0]), V3([0.5, 0.5, 0.5])]),
        vec!["Cs", "Cl"],
    ).with_masses(vec![("Cs", 132.9), ("Cl", 35.45)])
}

pub fn perovskite() -> Structure
{
    Structure::new(
        Lattice::cubic(3.9),
        CoordsKind::Fracs(vec![
            V3([0.0, 0.0, 0.0]),
            V3([0.5, 0.5, 0.5]),
            V3([0.5, 0.5, 0.0]),
            V3([0.5, 0.0, 0.5]),
            V3([0.0, 0.5, 0.5]),
        ]),
        vec!["Sr", "Ti", "O", "O", "O"],
    )
}

/// Ideal hcp with unit nearest-neighbor distance.
pub fn hcp() -> Structure
{
    let lattice = Lattice::from_vectors(&[
        V3([1.0, 0.0, 0.0]),
        V3([-0.5, 0.75f64.sqrt(), 0.0]),
        V3([0.0, 0.0, 1.633]),
    ]);
    Structure::new(lattice, CoordsKind::Fracs(vec![
        V3([1.0 / 3.0, 2.0 / 3.0, 0.25]),
        V3([2.0 / 3.0, 1.0 / 3.0, 0.75]),
    ]), vec!["Mg", "Mg"])
}

/// Dynamical matrix of unit central springs between all pairs closer than `cutoff`.
///
/// `Φ(a0; bL) = -d̂ d̂ᵀ` for each bond, with the on-site term balancing them.
pub fn spring_dynmat(structure: &Structure, q: &V3, cutoff: f64) -> Dynmat
{
    let lattice = structure.lattice().expect("fixture has a cell");
    let carts = structure.carts();
    let n = carts.len();
    let mut out = Dynmat::zeros(3 * n, 3 * n);
    for a in 0..n {
        for b in 0..n {
            for i in -2..=2 {
                for j in -2..=2 {
                    for k in -2..=2 {
                        let cell = V3([i as f64, j as f64, k as f64]) * lattice;
                        let d = carts[b] + cell - carts[a];
                        let r = d.norm();
                        if r < 1e-8 || r > cutoff {
                            continue;
                        }
                        let u = d / r;
                        let outer = M33::from_fn(|row, col| u[row] * u[col]);
                        let phase = Complex64::from_polar(1.0, 2.0 * PI * q.dot(&cell));
                        blocks::add_to_block(&mut out, a, b, &(blocks::complexify(&-outer) * phase));
                        blocks::add_to_block(&mut out, a, a, &blocks::complexify(&outer));
                    }
                }
            }
        }
    }
    out
}

pub fn random_dynmat(num_atoms: usize, rng: &mut impl Rng) -> Dynmat
{
    let dim = 3 * num_atoms;
    Dynmat::from_fn(dim, dim, |_, _| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
}

pub fn max_abs_diff(a: &Dynmat, b: &Dynmat) -> f64
{ (a - b).iter().map(|x| x.norm()).fold(0.0, f64::max) }
