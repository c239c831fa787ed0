/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::Lattice;

use phonsym_array_types::V3;

/// The shortest image of a fractional displacement, as a fractional displacement.
///
/// Only the 27 cells around the origin are searched, which is exact for cells
/// of modest skew.
pub fn nearest_image_frac_diff(lattice: &Lattice, frac_diff: &V3) -> V3
{
    let centered = frac_diff.wrap_centered();

    let mut best = centered;
    let mut best_sqnorm = (centered * lattice).sqnorm();
    for &a in &[-1.0, 0.0, 1.0] {
        for &b in &[-1.0, 0.0, 1.0] {
            for &c in &[-1.0, 0.0, 1.0] {
                let candidate = centered + V3([a, b, c]);
                let sqnorm = (candidate * lattice).sqnorm();
                if sqnorm < best_sqnorm {
                    best = candidate;
                    best_sqnorm = sqnorm;
                }
            }
        }
    }
    best
}

/// Cartesian distance between two fractional points, minimized over periodic images.
pub fn nearest_image_distance(lattice: &Lattice, frac_a: &V3, frac_b: &V3) -> f64
{ (nearest_image_frac_diff(lattice, &(frac_a - frac_b)) * lattice).norm() }

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn skewed_cell_needs_neighbor_search() {
        // the rounded difference is not the shortest image in this cell
        let lattice = Lattice::from_vectors(&[
            V3([1.0, 0.0, 0.0]),
            V3([0.9, 0.5, 0.0]),
            V3([0.0, 0.0, 1.0]),
        ]);
        let diff = V3([0.45, 0.45, 0.0]);
        let naive = (diff.wrap_centered() * &lattice).norm();
        let best = nearest_image_frac_diff(&lattice, &diff);
        assert!((best * &lattice).norm() < naive);
        assert_close!(abs=1e-12, (best - diff).map(|x| x - x.round()), V3::zero());
    }

    #[test]
    fn distance_is_symmetric() {
        let lattice = Lattice::cubic(2.0);
        let a = V3([0.95, 0.0, 0.5]);
        let b = V3([0.05, 0.0, 0.5]);
        assert_close!(abs=1e-12, nearest_image_distance(&lattice, &a, &b), 0.2);
        assert_close!(abs=1e-12, nearest_image_distance(&lattice, &b, &a), 0.2);
    }
}
