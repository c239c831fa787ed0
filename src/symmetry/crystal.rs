/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Result, SymmetryError};

use phonsym_array_types::V3;
use phonsym_structure::{Lattice, Structure, nearest_image_frac_diff};

/// The fixed geometric inputs of symmetry analysis, derived once from a `Structure`.
#[derive(Debug, Clone)]
pub struct Crystal {
    lattice: Lattice,
    reciprocal: Lattice,
    fracs: Vec<V3>,
    carts: Vec<V3>,
    species: Vec<usize>,
}

impl Crystal {
    /// Fails with `InvalidStructure` when the structure has no unit cell.
    pub fn from_structure(structure: &Structure) -> Result<Crystal>
    {
        let lattice = structure.lattice().ok_or(SymmetryError::InvalidStructure)?.clone();
        let carts = structure.to_carts();
        let fracs = carts.iter().map(|v| v / &lattice).collect();
        Ok(Crystal {
            reciprocal: lattice.reciprocal(),
            lattice,
            fracs,
            carts,
            species: structure.species_indices(),
        })
    }

    pub fn lattice(&self) -> &Lattice { &self.lattice }
    pub fn reciprocal(&self) -> &Lattice { &self.reciprocal }
    pub fn fracs(&self) -> &[V3] { &self.fracs }
    pub fn carts(&self) -> &[V3] { &self.carts }
    pub fn species(&self) -> &[usize] { &self.species }
    pub fn num_atoms(&self) -> usize { self.carts.len() }

    /// Cartesian q (inverse length, no 2π) to reciprocal fractional coordinates.
    pub fn q_to_frac(&self, q: &V3) -> V3
    { q / &self.reciprocal }

    pub fn q_from_frac(&self, k: &V3) -> V3
    { k * &self.reciprocal }

    /// Whether two fractional wavevectors differ by a reciprocal lattice
    /// vector, up to a cartesian tolerance.
    pub fn recip_fracs_equivalent(&self, k1: &V3, k2: &V3, tol: f64) -> bool
    {
        let diff = nearest_image_frac_diff(&self.reciprocal, &(k1 - k2));
        (diff * &self.reciprocal).norm() < tol
    }

    /// Whether two cartesian wavevectors differ by a reciprocal lattice vector.
    pub fn q_equivalent(&self, q1: &V3, q2: &V3, tol: f64) -> bool
    { self.recip_fracs_equivalent(&self.q_to_frac(q1), &self.q_to_frac(q2), tol) }
}
