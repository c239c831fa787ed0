/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! 3x3 atom-pair blocks of `3N x 3N` matrices, and their change of basis.

use phonsym_array_types::M33;
use phonsym_structure::Lattice;

use nalgebra::DMatrix;
use num_complex::Complex64;

/// A dynamical matrix. Row `3a+α`, column `3b+β`.
pub type Dynmat = DMatrix<Complex64>;

pub fn num_atoms_of(m: &Dynmat) -> usize
{ m.nrows() / 3 }

pub fn block(m: &Dynmat, a: usize, b: usize) -> M33<Complex64>
{ M33::from_fn(|r, c| m[(3 * a + r, 3 * b + c)]) }

pub fn set_block(m: &mut Dynmat, a: usize, b: usize, value: &M33<Complex64>)
{
    for r in 0..3 {
        for c in 0..3 {
            m[(3 * a + r, 3 * b + c)] = value[r][c];
        }
    }
}

pub fn add_to_block(m: &mut Dynmat, a: usize, b: usize, value: &M33<Complex64>)
{
    for r in 0..3 {
        for c in 0..3 {
            m[(3 * a + r, 3 * b + c)] += value[r][c];
        }
    }
}

pub fn complexify(m: &M33) -> M33<Complex64>
{ m.map(|x| Complex64::new(x, 0.0)) }

/// Apply `f` to every atom-pair block.
pub fn map_blocks(m: &Dynmat, mut f: impl FnMut(M33<Complex64>) -> M33<Complex64>) -> Dynmat
{
    let n = num_atoms_of(m);
    let mut out = Dynmat::zeros(3 * n, 3 * n);
    for a in 0..n {
        for b in 0..n {
            set_block(&mut out, a, b, &f(block(m, a, b)));
        }
    }
    out
}

/// Cartesian blocks `M` to crystal blocks `L^-T M L^-1`, on which a
/// `FracRot` acts as `W M Wᵀ`.
pub fn cart_to_crystal(m: &Dynmat, lattice: &Lattice) -> Dynmat
{
    let left = complexify(&lattice.inverse_matrix().t());
    let right = complexify(lattice.inverse_matrix());
    map_blocks(m, |b| &left * &b * &right)
}

/// Inverse of `cart_to_crystal`: `M = Lᵀ M_c L`.
pub fn crystal_to_cart(m: &Dynmat, lattice: &Lattice) -> Dynmat
{
    let left = complexify(&lattice.matrix().t());
    let right = complexify(lattice.matrix());
    map_blocks(m, |b| &left * &b * &right)
}

pub fn tensor_to_crystal(t: &M33, lattice: &Lattice) -> M33
{ lattice.inverse_matrix().t() * t * lattice.inverse_matrix() }

pub fn tensor_to_cart(t: &M33, lattice: &Lattice) -> M33
{ lattice.matrix().t() * t * lattice.matrix() }
