/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Atom mappings induced by space group operations.

use crate::{Lattice, FracOp};
use crate::algo::nearest_image::nearest_image_distance;

use phonsym_array_types::V3;
use phonsym_soa_ops::Perm;

#[derive(Debug, Fail)]
pub enum PositionMatchError {
    #[fail(display = "no atom lies at the image of atom {}", atom)]
    NoMatch { atom: usize },
    #[fail(display = "the image of atom {} is ambiguous or already taken", atom)]
    DuplicateMatch { atom: usize },
}

/// Compute the permutation induced by a space group operation.
///
/// The output sends each atom `b` to the atom `a` (of equal metadata) that
/// lies at `W x_b + t` up to a lattice translation; i.e. `perm.permute_index(b) == a`.
///
/// `tol` is a cartesian distance.
pub fn of_operator_with_meta<M: PartialEq>(
    lattice: &Lattice,
    meta: &[M],
    fracs: &[V3],
    op: &FracOp,
    tol: f64,
) -> Result<Perm, PositionMatchError>
{
    assert_eq!(meta.len(), fracs.len());
    let images = op.transform_fracs(fracs);
    brute_force(lattice, meta, &images, fracs, tol)
}

/// Compute permutations for all operators in a space group.
pub fn of_spacegroup_with_meta<M: PartialEq>(
    lattice: &Lattice,
    meta: &[M],
    fracs: &[V3],
    ops: &[FracOp],
    tol: f64,
) -> Result<Vec<Perm>, PositionMatchError>
{
    ops.iter()
        .map(|op| of_operator_with_meta(lattice, meta, fracs, op, tol))
        .collect()
}

/// `of_spacegroup_with_meta`, for structures of a single species.
pub fn of_spacegroup(
    lattice: &Lattice,
    fracs: &[V3],
    ops: &[FracOp],
    tol: f64,
) -> Result<Vec<Perm>, PositionMatchError>
{ of_spacegroup_with_meta(lattice, &vec![(); fracs.len()], fracs, ops, tol) }

// Quadratic, but the structures handled here are primitive cells.
fn brute_force<M: PartialEq>(
    lattice: &Lattice,
    meta: &[M],
    images: &[V3],
    targets: &[V3],
    tol: f64,
) -> Result<Perm, PositionMatchError>
{
    const UNSET: usize = ::std::usize::MAX;

    let n = images.len();
    let mut dest = vec![UNSET; n];
    let mut taken = vec![false; n];
    for from in 0..n {
        let mut matches = (0..n).filter(|&to| {
            meta[to] == meta[from]
                && nearest_image_distance(lattice, &images[from], &targets[to]) < tol
        });

        let to = match (matches.next(), matches.next()) {
            (None, _) => return Err(PositionMatchError::NoMatch { atom: from }),
            (Some(_), Some(_)) => return Err(PositionMatchError::DuplicateMatch { atom: from }),
            (Some(to), None) => to,
        };
        if taken[to] {
            return Err(PositionMatchError::DuplicateMatch { atom: from });
        }
        taken[to] = true;
        dest[from] = to;
    }

    Ok(Perm::from_raw_inv(dest).expect("(BUG) invalid perm without match error!?"))
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::FracRot;
    use phonsym_array_types::mat;
    use phonsym_soa_ops::Permute;
    use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

    #[test]
    fn recovers_random_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let lattice = Lattice::orthorhombic(5.0, 6.0, 7.0);
        let fracs: Vec<V3> = (0..20).map(|_| V3(rng.gen())).collect();

        let mut pull: Vec<usize> = (0..20).collect();
        pull.shuffle(&mut rng);
        let perm = Perm::from_vec(pull).unwrap();
        let permuted = fracs.clone().permuted_by(&perm);

        // identity operator, but the targets have been shuffled
        let output = brute_force(&lattice, &[(); 20], &fracs, &permuted, 1e-5).unwrap();
        assert_eq!(output, perm);
    }

    #[test]
    fn mirror_in_cscl() {
        let lattice = Lattice::cubic(4.0);
        let fracs = vec![V3([0.0, 0.0, 0.0]), V3([0.5, 0.5, 0.5])];
        let meta = vec!["Cs", "Cl"];
        let mirror = FracOp::from(FracRot::new(&mat::from_array([[-1, 0, 0], [0, 1, 0], [0, 0, 1]])));
        let perm = of_operator_with_meta(&lattice, &meta, &fracs, &mirror, 1e-5).unwrap();
        assert!(perm.is_identity());

        // a shift by half a body diagonal would swap the atoms if they were the same species
        let shift = FracOp::new(FracRot::eye(), V3([0.5, 0.5, 0.5]));
        match of_operator_with_meta(&lattice, &meta, &fracs, &shift, 1e-5) {
            Err(PositionMatchError::NoMatch { atom: 0 }) => {},
            r => panic!("unexpected: {:?}", r),
        }
        let perms = of_spacegroup(&lattice, &fracs, &[FracOp::eye(), shift], 1e-5).unwrap();
        assert_eq!(perms[1].permute_index(0), 1);
        assert_eq!(perms[1].permute_index(1), 0);
    }

    #[test]
    fn coincident_atoms_are_ambiguous() {
        let lattice = Lattice::cubic(4.0);
        let fracs = vec![V3([0.0, 0.0, 0.0]), V3([1e-7, 0.0, 0.0])];
        match of_spacegroup(&lattice, &fracs, &[FracOp::eye()], 1e-3) {
            Err(PositionMatchError::DuplicateMatch { atom: 0 }) => {},
            r => panic!("unexpected: {:?}", r),
        }
    }
}
