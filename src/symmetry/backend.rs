/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The numerical half of symmetry analysis.
//!
//! A [`SymmetryBackend`] receives everything it needs as arguments (including
//! the matching tolerance) and returns freshly allocated results. It never
//! mutates its inputs, and implementations must not keep hidden scratch state,
//! so that a discovered table can be shared between threads.

use crate::{Result, SymmetryError, Crystal};
use crate::asr::{self, AsrMode, Axis};
use crate::blocks::{self, Dynmat};

use phonsym_array_types::{V3, M33};
use phonsym_soa_ops::Perm;
use phonsym_structure::{Lattice, FracRot, FracOp, find_perm, lattice_point_group};

use num_complex::Complex64;
use std::f64::consts::PI;

/// Output of `restrict_to_little_group`.
#[derive(Debug, Clone, PartialEq)]
pub struct LittleGroup {
    /// Indices into the input operations of those with `S q ≡ q`, in input order.
    pub members: Vec<usize>,
    /// Index into the input operations of one with `S q ≡ -q`, if any.
    pub minus_q: Option<usize>,
}

/// Output of `star_of_vector`, in reciprocal fractional coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    /// Distinct images of the vector. The vector itself comes first.
    pub members: Vec<V3>,
    pub contains_minus_q: bool,
}

/// An operation together with its action on the atoms.
#[derive(Debug, Copy, Clone)]
pub struct MappedOp<'a> {
    pub op: &'a FracOp,
    pub perm: &'a Perm,
    /// Cartesian lattice vectors `R τ_b + f - τ_{g(b)}`.
    pub shifts: &'a [V3],
}

/// Everything the dynamical matrix primitive needs to know about a q-point.
#[derive(Debug, Clone)]
pub struct DynmatSymmetry<'a> {
    pub crystal: &'a Crystal,
    /// Cartesian.
    pub q: V3,
    pub little_group: Vec<MappedOp<'a>>,
    pub minus_q: Option<MappedOp<'a>>,
}

pub trait SymmetryBackend {
    /// Rotations that map the lattice onto itself. The identity comes first.
    fn find_bravais_operations(&self, lattice: &Lattice, threshold: f64) -> Vec<FracRot>;

    /// Space group operations (rotation and translation) that map the
    /// decorated crystal onto itself, built from the given rotations.
    fn restrict_to_crystal(&self, rots: &[FracRot], crystal: &Crystal, threshold: f64) -> Vec<FracOp>;

    fn restrict_to_little_group(&self, ops: &[FracOp], crystal: &Crystal, q_frac: &V3, threshold: f64) -> LittleGroup;

    fn compute_atom_mapping(&self, ops: &[FracOp], crystal: &Crystal, threshold: f64) -> Result<Vec<Perm>>;

    fn compute_fractional_shifts(&self, ops: &[FracOp], mapping: &[Perm], crystal: &Crystal) -> Vec<Vec<V3>>;

    fn star_of_vector(&self, q_frac: &V3, ops: &[FracOp], crystal: &Crystal, threshold: f64) -> Star;

    /// Project a dynamical matrix in crystal blocks onto the invariants of
    /// the little group (and time reversal, when a minus-q operation exists).
    fn symmetrize_dynamical_matrix(&self, matrix: &Dynmat, input: &DynmatSymmetry<'_>) -> Dynmat;

    /// Group average of a tensor in crystal coordinates.
    fn symmetrize_tensor(&self, tensor: &M33, ops: &[FracOp]) -> M33;

    /// Group average of per-atom vectors in fractional coordinates.
    fn symmetrize_vector(&self, fracs: &[V3], ops: &[FracOp], mapping: &[Perm]) -> Vec<V3>;

    /// Returns the corrected force constants and, if given, charges.
    /// `Custom` and `No` return the charges unchanged.
    fn impose_sum_rule(
        &self,
        force_constants: &Dynmat,
        mode: AsrMode,
        axis: Axis,
        carts: &[V3],
        effective_charges: Option<&[M33]>,
    ) -> (Dynmat, Option<Vec<M33>>);
}

/// Pure Rust implementation of every primitive.
#[derive(Debug, Copy, Clone, Default)]
pub struct NativeBackend;

impl SymmetryBackend for NativeBackend {
    fn find_bravais_operations(&self, lattice: &Lattice, threshold: f64) -> Vec<FracRot>
    { lattice_point_group(lattice, threshold) }

    fn restrict_to_crystal(&self, rots: &[FracRot], crystal: &Crystal, threshold: f64) -> Vec<FracOp>
    {
        let fracs = crystal.fracs();
        let species = crystal.species();
        let anchor = match rarest_species_atom(species) {
            Some(anchor) => anchor,
            None => return rots.iter().map(|&rot| FracOp::from(rot)).collect(),
        };

        let mut out: Vec<FracOp> = vec![];
        for rot in rots {
            let image = rot.transform_frac(&fracs[anchor]);
            for (a, frac) in fracs.iter().enumerate() {
                if species[a] != species[anchor] {
                    continue;
                }
                let op = FracOp::new(*rot, frac - image);
                if out.iter().any(|prev| prev.approx_eq(&op, 1e-8)) {
                    continue;
                }
                if find_perm::of_operator_with_meta(crystal.lattice(), species, fracs, &op, threshold).is_ok() {
                    out.push(op);
                }
            }
        }
        out
    }

    fn restrict_to_little_group(&self, ops: &[FracOp], crystal: &Crystal, q_frac: &V3, threshold: f64) -> LittleGroup
    {
        let images: Vec<V3> = ops.iter().map(|op| op.rot().transform_recip_frac(q_frac)).collect();
        let members: Vec<usize> = (0..ops.len())
            .filter(|&i| crystal.recip_fracs_equivalent(&images[i], q_frac, threshold))
            .collect();

        // prefer a member of the little group, as it composes with the others
        let minus_q = {
            let others = (0..ops.len()).filter(|i| !members.contains(i));
            members.iter().cloned().chain(others)
                .find(|&i| crystal.recip_fracs_equivalent(&images[i], &-q_frac, threshold))
        };
        LittleGroup { members, minus_q }
    }

    fn compute_atom_mapping(&self, ops: &[FracOp], crystal: &Crystal, threshold: f64) -> Result<Vec<Perm>>
    {
        ops.iter().enumerate().map(|(index, op)| {
            find_perm::of_operator_with_meta(crystal.lattice(), crystal.species(), crystal.fracs(), op, threshold)
                .map_err(|e| {
                    let atom = match e {
                        find_perm::PositionMatchError::NoMatch { atom } => atom,
                        find_perm::PositionMatchError::DuplicateMatch { atom } => atom,
                    };
                    SymmetryError::AmbiguousAtomMapping { op: index, atom }
                })
        }).collect()
    }

    fn compute_fractional_shifts(&self, ops: &[FracOp], mapping: &[Perm], crystal: &Crystal) -> Vec<Vec<V3>>
    {
        let fracs = crystal.fracs();
        izip!(ops, mapping).map(|(op, perm)| {
            fracs.iter().enumerate().map(|(b, frac)| {
                let dest = perm.permute_index(b);
                let diff = op.transform_frac(frac) - fracs[dest];
                diff.map(f64::round) * crystal.lattice()
            }).collect()
        }).collect()
    }

    fn star_of_vector(&self, q_frac: &V3, ops: &[FracOp], crystal: &Crystal, threshold: f64) -> Star
    {
        let mut members: Vec<V3> = vec![*q_frac];
        for op in ops {
            let image = op.rot().transform_recip_frac(q_frac);
            if !members.iter().any(|m| crystal.recip_fracs_equivalent(m, &image, threshold)) {
                members.push(image);
            }
        }
        let contains_minus_q = members.iter()
            .any(|m| crystal.recip_fracs_equivalent(m, &-q_frac, threshold));
        Star { members, contains_minus_q }
    }

    fn symmetrize_dynamical_matrix(&self, matrix: &Dynmat, input: &DynmatSymmetry<'_>) -> Dynmat
    {
        let DynmatSymmetry { crystal, q, ref little_group, minus_q } = *input;

        let mut d = (matrix + matrix.adjoint()) * Complex64::new(0.5, 0.0);

        if let Some(mapped) = minus_q {
            let reversed = rotate_dynmat(&d, crystal, &mapped, &q).map(|x| x.conj());
            d = (d + reversed) * Complex64::new(0.5, 0.0);
        }

        let mut acc = Dynmat::zeros(d.nrows(), d.ncols());
        for mapped in little_group {
            acc += rotate_dynmat(&d, crystal, mapped, &q);
        }
        acc / Complex64::new(little_group.len() as f64, 0.0)
    }

    fn symmetrize_tensor(&self, tensor: &M33, ops: &[FracOp]) -> M33
    {
        let sum = ops.iter()
            .map(|op| {
                let w = op.rot().float_matrix();
                &w * tensor * w.t()
            })
            .fold(M33::zero(), |acc, t| acc + t);
        sum / ops.len() as f64
    }

    fn symmetrize_vector(&self, fracs: &[V3], ops: &[FracOp], mapping: &[Perm]) -> Vec<V3>
    {
        let mut out = vec![V3::zero(); fracs.len()];
        for (op, perm) in izip!(ops, mapping) {
            for (b, frac) in fracs.iter().enumerate() {
                out[perm.permute_index(b)] += op.rot().transform_frac(frac);
            }
        }
        let n = ops.len() as f64;
        out.into_iter().map(|v| v / n).collect()
    }

    fn impose_sum_rule(
        &self,
        force_constants: &Dynmat,
        mode: AsrMode,
        axis: Axis,
        carts: &[V3],
        effective_charges: Option<&[M33]>,
    ) -> (Dynmat, Option<Vec<M33>>)
    {
        let unchanged = || effective_charges.map(<[M33]>::to_vec);
        let neutral = || effective_charges.map(asr::subtract_mean_charge);
        let rotation_axes = match mode {
            AsrMode::No => return (force_constants.clone(), unchanged()),
            AsrMode::Simple => return (asr::simple(force_constants), neutral()),
            AsrMode::Crystal | AsrMode::Custom => vec![],
            AsrMode::OneDim => vec![axis],
            AsrMode::ZeroDim => vec![Axis::X, Axis::Y, Axis::Z],
        };
        let basis = asr::rigid_motions(carts, &rotation_axes);
        let charges = match mode {
            AsrMode::Custom => unchanged(),
            _ => neutral(),
        };
        (asr::project_out(force_constants, &basis), charges)
    }
}

/// `T_g D`: `out[g(a), g(b)] = exp(2πi Rq·(s_b - s_a)) W D[a, b] Wᵀ`, on crystal blocks.
pub(crate) fn rotate_dynmat(d: &Dynmat, crystal: &Crystal, mapped: &MappedOp<'_>, q: &V3) -> Dynmat
{
    let MappedOp { op, perm, shifts } = *mapped;
    let n = blocks::num_atoms_of(d);
    let w = blocks::complexify(&op.rot().float_matrix());
    let wt = w.t();
    let image_q = crystal.q_from_frac(&op.rot().transform_recip_frac(&crystal.q_to_frac(q)));

    let mut out = Dynmat::zeros(d.nrows(), d.ncols());
    for a in 0..n {
        for b in 0..n {
            let phase = Complex64::from_polar(1.0, 2.0 * PI * image_q.dot(&(shifts[b] - shifts[a])));
            let rotated = &w * &blocks::block(d, a, b) * &wt * phase;
            blocks::set_block(&mut out, perm.permute_index(a), perm.permute_index(b), &rotated);
        }
    }
    out
}

// the first atom of the least common species
fn rarest_species_atom(species: &[usize]) -> Option<usize>
{
    let mut counts = vec![0; species.iter().max().map_or(0, |&m| m + 1)];
    for &s in species {
        counts[s] += 1;
    }
    let rarest = (0..counts.len()).min_by_key(|&s| counts[s])?;
    species.iter().position(|&s| s == rarest)
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    fn perovskite() -> Crystal
    { Crystal::from_structure(&crate::testing::perovskite()).unwrap() }

    #[test]
    fn rarest_species() {
        assert_eq!(rarest_species_atom(&[0, 0, 1, 2, 2]), Some(2));
        assert_eq!(rarest_species_atom(&[]), None);
    }

    #[test]
    fn perovskite_space_group() {
        let crystal = perovskite();
        let rots = NativeBackend.find_bravais_operations(crystal.lattice(), 1e-5);
        let ops = NativeBackend.restrict_to_crystal(&rots, &crystal, 1e-5);
        assert_eq!(ops.len(), 48);
        assert_eq!(ops[0], FracOp::eye());
        // symmorphic with the origin on Sr
        assert!(ops.iter().all(|op| op.trans() == V3::zero()));
    }

    #[test]
    fn little_group_at_x() {
        let crystal = perovskite();
        let rots = NativeBackend.find_bravais_operations(crystal.lattice(), 1e-5);
        let ops = NativeBackend.restrict_to_crystal(&rots, &crystal, 1e-5);

        let x_point = V3([0.5, 0.0, 0.0]);
        let little = NativeBackend.restrict_to_little_group(&ops, &crystal, &x_point, 1e-5);
        assert_eq!(little.members.len(), 16);
        assert_eq!(little.minus_q, Some(0));

        let star = NativeBackend.star_of_vector(&x_point, &ops, &crystal, 1e-5);
        assert_eq!(star.members.len(), 3);
        assert!(star.contains_minus_q);

        let generic = V3([0.1, 0.2, 0.3]);
        let star = NativeBackend.star_of_vector(&generic, &ops, &crystal, 1e-5);
        assert_eq!(star.members.len(), 48);
        let little = NativeBackend.restrict_to_little_group(&ops, &crystal, &generic, 1e-5);
        assert_eq!(little.members, vec![0]);
        assert!(little.minus_q.is_some());
    }

    #[test]
    fn shifts_are_lattice_vectors() {
        let crystal = perovskite();
        let rots = NativeBackend.find_bravais_operations(crystal.lattice(), 1e-5);
        let ops = NativeBackend.restrict_to_crystal(&rots, &crystal, 1e-5);
        let mapping = NativeBackend.compute_atom_mapping(&ops, &crystal, 1e-5).unwrap();
        let shifts = NativeBackend.compute_fractional_shifts(&ops, &mapping, &crystal);
        for (op, perm, op_shifts) in izip!(&ops, &mapping, &shifts) {
            for (b, shift) in op_shifts.iter().enumerate() {
                let expected = op.transform_frac(&crystal.fracs()[b]) - crystal.fracs()[perm.permute_index(b)];
                assert_close!(abs=1e-9, *shift, expected * crystal.lattice());
            }
        }
    }

    #[test]
    fn tensor_average_is_isotropic_for_cubic() {
        let crystal = perovskite();
        let rots = NativeBackend.find_bravais_operations(crystal.lattice(), 1e-5);
        let ops = NativeBackend.restrict_to_crystal(&rots, &crystal, 1e-5);
        let t = M33::from_fn(|r, c| (1 + r + 3 * c) as f64);
        let sym = NativeBackend.symmetrize_tensor(&t, &ops);
        let mean = t.trace() / 3.0;
        assert_close!(abs=1e-12, sym, M33::eye() * mean);
    }
}
