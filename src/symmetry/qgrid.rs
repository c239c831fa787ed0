/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Commensurate q-point grids.
//!
//! All q-points here are cartesian, in the units of the reciprocal lattice
//! (no factor of 2π).

use crate::{Result, SymmetryError};

use phonsym_array_types::V3;
use phonsym_structure::{Lattice, nearest_image_frac_diff};

/// The q-points commensurate with a diagonal supercell of `unit_cell`.
///
/// Each point is `Σ n_i / s_i b_i` for `0 <= n_i < s_i`, moved to its
/// shortest image. Γ comes first.
pub fn q_grid(unit_cell: &Lattice, supercell: [u32; 3]) -> Result<Vec<V3>>
{
    let recip = unit_cell.reciprocal();
    let [s1, s2, s3] = supercell;

    let mut fracs: Vec<V3> = vec![];
    for i in 0..s1 {
        for j in 0..s2 {
            for k in 0..s3 {
                let frac = V3([
                    i as f64 / s1 as f64,
                    j as f64 / s2 as f64,
                    k as f64 / s3 as f64,
                ]);
                let frac = nearest_image_frac_diff(&recip, &frac);
                if fracs.iter().any(|prev| (prev - frac).wrap_centered().norm() < 1e-8) {
                    return Err(SymmetryError::DuplicateQPoint { q: frac * &recip });
                }
                fracs.push(frac);
            }
        }
    }
    Ok(fracs.into_iter().map(|k| k * &recip).collect())
}

/// Whether `qs` is the q-point grid of the supercell.
///
/// Every q-point must be commensurate with the supercell, i.e. `q · (s_i a_i)`
/// is an integer (within `tol`) for each axis, and every point of
/// [`q_grid`] must appear in `qs` up to a reciprocal lattice vector.
/// A missing point or swapped supercell axes give `false`.
pub fn check_supercell_q(unit_cell: &Lattice, supercell: [u32; 3], qs: &[V3], tol: f64) -> bool
{
    let vectors = unit_cell.vectors();
    let commensurate = qs.iter().all(|q| {
        (0..3).all(|i| {
            let x = q.dot(&(vectors[i] * supercell[i] as f64));
            (x - x.round()).abs() < tol
        })
    });
    if !commensurate {
        return false;
    }

    let grid = match q_grid(unit_cell, supercell) {
        Ok(grid) => grid,
        Err(e) => {
            debug!("no grid for supercell {:?}: {}", supercell, e);
            return false;
        },
    };
    let recip = unit_cell.reciprocal();
    let fracs: Vec<V3> = qs.iter().map(|q| q / &recip).collect();
    grid.iter().all(|point| {
        let frac = point / &recip;
        let found = fracs.iter().any(|q| (q - frac).wrap_centered().norm() < tol);
        if !found {
            debug!("grid point {:?} is missing from the q-points", point);
        }
        found
    })
}

/// Carry q-points onto a strained cell, keeping their reciprocal
/// crystal coordinates.
pub fn q_after_strain(old_cell: &Lattice, new_cell: &Lattice, qs: &[V3]) -> Vec<V3>
{
    let old_recip = old_cell.reciprocal();
    let new_recip = new_cell.reciprocal();
    qs.iter().map(|q| (q / &old_recip) * &new_recip).collect()
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn cubic_grid() {
        let lattice = Lattice::cubic(2.0);
        let qs = q_grid(&lattice, [2, 2, 2]).unwrap();
        assert_eq!(qs.len(), 8);
        assert_eq!(qs[0], V3::zero());
        for q in &qs {
            for &x in &q.0 {
                assert!(x.abs() < 1e-12 || (x.abs() - 0.25).abs() < 1e-12, "{:?}", q);
            }
        }
        assert!(check_supercell_q(&lattice, [2, 2, 2], &qs, 1e-8));
        assert!(!check_supercell_q(&lattice, [2, 2, 2], &[V3([0.125, 0.0, 0.0])], 1e-8));
    }

    #[test]
    fn incomplete_grids_are_rejected() {
        let lattice = Lattice::cubic(2.0);
        let qs = q_grid(&lattice, [2, 2, 2]).unwrap();

        // Γ alone is commensurate but misses seven points
        assert!(!check_supercell_q(&lattice, [2, 2, 2], &[V3::zero()], 1e-8));
        assert!(!check_supercell_q(&lattice, [2, 2, 2], &qs[..7], 1e-8));

        // images and reordering are fine
        let mut shifted: Vec<V3> = qs.iter().rev().cloned().collect();
        shifted[0] = shifted[0] + V3([0.5, 0.0, 0.0]);
        assert!(check_supercell_q(&lattice, [2, 2, 2], &shifted, 1e-8));

        // swapped supercell axes
        let qs = q_grid(&lattice, [1, 2, 2]).unwrap();
        assert!(check_supercell_q(&lattice, [1, 2, 2], &qs, 1e-8));
        assert!(!check_supercell_q(&lattice, [2, 1, 2], &qs, 1e-8));

        let qs = q_grid(&lattice, [4, 1, 1]).unwrap();
        assert!(qs.iter().any(|q| (q - V3([0.125, 0.0, 0.0])).norm() < 1e-12));
        assert!(check_supercell_q(&lattice, [4, 1, 1], &qs, 1e-8));
    }

    #[test]
    fn hexagonal_grid_has_k() {
        let structure = testing::hcp();
        let lattice = structure.lattice().unwrap();
        let qs = q_grid(lattice, [3, 3, 1]).unwrap();
        assert_eq!(qs.len(), 9);

        let k = V3([1.0 / 3.0, 1.0 / 3.0, 0.0]) * &lattice.reciprocal();
        let k_frac = k / &lattice.reciprocal();
        let matches = qs.iter()
            .filter(|q| ((*q / &lattice.reciprocal()) - k_frac).wrap_centered().norm() < 1e-8)
            .count();
        assert_eq!(matches, 1);

        // folded points are no longer than any of their images
        for q in &qs {
            let frac = q / &lattice.reciprocal();
            for shift in &[V3([1.0, 0.0, 0.0]), V3([0.0, 1.0, 0.0]), V3([1.0, 1.0, 0.0])] {
                assert!(q.norm() <= ((frac - shift) * &lattice.reciprocal()).norm() + 1e-12);
                assert!(q.norm() <= ((frac + shift) * &lattice.reciprocal()).norm() + 1e-12);
            }
        }
    }

    #[test]
    fn strain_keeps_crystal_coordinates() {
        let old = Lattice::cubic(1.0);
        let new = Lattice::orthorhombic(2.0, 1.0, 4.0);
        let qs = vec![V3([0.5, 0.5, 0.5])];
        let strained = q_after_strain(&old, &new, &qs);
        assert_close!(abs=1e-12, strained[0], V3([0.25, 0.5, 0.125]));
    }
}
