/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Lattice, FracRot};

use phonsym_array_types::{V3, M3, M33};

/// Every rotation (proper or improper) that maps the lattice onto itself.
///
/// `tol` is relative to the lengths of the lattice vectors. The identity is
/// always the first element.
///
/// The search range is generous, but strongly skewed cells should still be
/// reduced beforehand.
pub fn lattice_point_group(lattice: &Lattice, tol: f64) -> Vec<FracRot>
{
    // For a given lattice, each rotation operator has a corresponding
    //  unimodular transform:
    //
    //   (forall R. exists σ unimodular.)  L R^T = σ L
    //
    // It is easy to show that σ must satisfy:  (σ L) (σ L)^T == L L^T
    //
    // From the diagonal elements of this equality, we see that the 'kth' row
    // of (σ L) must be equal in length to the kth row of L.
    //
    // This gives us an *extremely* small search space for valid rotations.
    let lengths = lattice.norms();
    let choices_frac: Vec<Vec<V3<i32>>> = lengths.iter()
        .map(|&len| lattice_points_of_length(lattice, len, tol))
        .collect();
    let choices_cart: Vec<Vec<V3>> = choices_frac.iter()
        .map(|choices| choices.iter().map(|v| v.map(f64::from) * lattice).collect())
        .collect();

    // off diagonal elements of L L^T
    let metric_off_diags = |m: &[V3; 3]| [
        m[1].dot(&m[2]),
        m[2].dot(&m[0]),
        m[0].dot(&m[1]),
    ];
    let target_off_diags = metric_off_diags(lattice.vectors());
    let scale = lengths.iter().cloned().fold(0.0, f64::max);
    let eff_tol = tol * scale * scale;

    let mut out = vec![];
    for (&frac_0, &cart_0) in izip!(&choices_frac[0], &choices_cart[0]) {
        for (&frac_1, &cart_1) in izip!(&choices_frac[1], &choices_cart[1]) {
            for (&frac_2, &cart_2) in izip!(&choices_frac[2], &choices_cart[2]) {
                let sigma = M3([frac_0, frac_1, frac_2]);
                if sigma.det().abs() != 1 {
                    continue;
                }

                let off_diags = metric_off_diags(&[cart_0, cart_1, cart_2]);
                if (0..3).all(|k| (off_diags[k] - target_off_diags[k]).abs() <= eff_tol) {
                    out.push(FracRot::new(&sigma.t()));
                }
            }
        }
    }

    // identity first, the rest in a reproducible order
    out.sort_by_key(|rot| (!rot.is_identity(), *rot.matrix()));
    trace!("lattice point group has {} operations", out.len());
    out
}

fn lattice_points_of_length(lattice: &Lattice, target: f64, tol: f64) -> Vec<V3<i32>>
{
    LATTICE_POINTS.iter()
        .filter(|v| {
            let r = (v.map(f64::from) * lattice).norm();
            (r - target).abs() < tol * target
        })
        .cloned()
        .collect()
}

lazy_static!{
    // a set of fractional lattice coordinates large enough that, for a
    // reasonably reduced cell, this will include all vectors equal in length
    // to a cell vector
    static ref LATTICE_POINTS: Vec<V3<i32>> = {
        const MAX: i32 = 4;
        let mut points = Vec::with_capacity((2 * MAX + 1).pow(3) as usize);
        for i in -MAX..=MAX {
            for j in -MAX..=MAX {
                for k in -MAX..=MAX {
                    points.push(V3([i, j, k]));
                }
            }
        }
        points
    };
}

/// Test whether a rotation maps the lattice onto itself, i.e. `W^T G W == G`
/// for the metric `G`.
pub fn is_lattice_symmetry(lattice: &Lattice, rot: &FracRot, tol: f64) -> bool
{
    let g: M33 = lattice.metric();
    let w = rot.float_matrix();
    let diff = w.t() * &g * w - &g;
    diff.max_abs() <= tol * g.max_abs()
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    fn check_group(ops: &[FracRot]) {
        assert!(ops[0].is_identity());
        for a in ops {
            assert!(ops.contains(&a.inverse()));
            for b in ops {
                assert!(ops.contains(&a.then(b)));
            }
        }
    }

    #[test]
    fn cubic() {
        let lattice = Lattice::cubic(3.1);
        let ops = lattice_point_group(&lattice, 1e-5);
        assert_eq!(ops.len(), 48);
        check_group(&ops);
        assert!(ops.iter().all(|r| is_lattice_symmetry(&lattice, r, 1e-10)));
    }

    #[test]
    fn tetragonal_and_orthorhombic() {
        assert_eq!(lattice_point_group(&Lattice::orthorhombic(2.0, 2.0, 3.0), 1e-5).len(), 16);
        assert_eq!(lattice_point_group(&Lattice::orthorhombic(2.0, 2.5, 3.0), 1e-5).len(), 8);
    }

    #[test]
    fn hexagonal() {
        let lattice = Lattice::from_vectors(&[
            V3([1.0, 0.0, 0.0]),
            V3([-0.5, 0.75f64.sqrt(), 0.0]),
            V3([0.0, 0.0, 1.633]),
        ]);
        let ops = lattice_point_group(&lattice, 1e-5);
        assert_eq!(ops.len(), 24);
        check_group(&ops);
        assert!(ops.iter().all(|r| is_lattice_symmetry(&lattice, r, 1e-10)));
    }

    #[test]
    fn fcc_primitive() {
        let lattice = Lattice::from_vectors(&[
            V3([0.0, 0.5, 0.5]),
            V3([0.5, 0.0, 0.5]),
            V3([0.5, 0.5, 0.0]),
        ]);
        let ops = lattice_point_group(&lattice, 1e-5);
        assert_eq!(ops.len(), 48);
        check_group(&ops);
    }
}
