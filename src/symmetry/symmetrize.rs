/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Symmetrization of dynamical matrices, tensors, and per-atom vectors.
//!
//! Everything here overwrites its input in place. Matrices are given in
//! cartesian atom-pair blocks and q-points are cartesian (inverse length,
//! no factor of 2π).

use crate::{Result, SymmetryError, SymmetryBackend, SymmetryTable};
use crate::asr::check_square;
use crate::backend::{DynmatSymmetry, rotate_dynmat};
use crate::blocks::{self, Dynmat};
use crate::table::parse_q;

use phonsym_array_types::{V3, M33};

use num_complex::Complex64;

/// Output elements that receive less than this from an indicator tensor are
/// treated as independent of that input element.
const MASK_TOL: f64 = 1e-10;

/// Symmetrize the dynamical matrix at `q` under the little group of `q`.
///
/// The table must be discovered at `q` (or an equivalent point). The result
/// is Hermitian, invariant under every little group operation, and, when an
/// operation maps `q` to `-q`, invariant under that operation combined with
/// time reversal.
pub fn symmetrize_dynamical_matrix<B: SymmetryBackend>(
    table: &SymmetryTable<'_, B>,
    matrix: &mut Dynmat,
    q: &[f64],
) -> Result<()>
{
    let q = parse_q(q)?;
    let discovered = table.q_point().ok_or(SymmetryError::NotInitialized)?;
    if !table.q_equivalent(&discovered, &q) {
        return Err(SymmetryError::QPointMismatch { discovered, requested: q });
    }
    let crystal = table.crystal();
    check_square(matrix, crystal.num_atoms())?;

    let input = DynmatSymmetry {
        crystal,
        q,
        little_group: table.mapped_little_group()?,
        minus_q: table.minus_q_operation().map(|i| table.mapped_op(i)).transpose()?,
    };

    let crystal_blocks = blocks::cart_to_crystal(matrix, crystal.lattice());
    let symmetrized = table.backend().symmetrize_dynamical_matrix(&crystal_blocks, &input);
    *matrix = blocks::crystal_to_cart(&symmetrized, crystal.lattice());
    Ok(())
}

/// Make the dynamical matrices of a star mutually consistent.
///
/// `stack[i]` is the matrix at `members[i]`, and `members` must be one full
/// star. Every matrix is rotated onto every member it maps to, and each
/// member is replaced by the average of everything that landed on it.
///
/// Uses the whole space group, which the table stores whatever q-point it
/// was last discovered at.
pub fn symmetrize_across_star<B: SymmetryBackend>(
    table: &SymmetryTable<'_, B>,
    stack: &mut [Dynmat],
    members: &[V3],
) -> Result<()>
{
    let ops = table.mapped_crystal_operations()?;
    let crystal = table.crystal();
    let nq = members.len();
    if stack.len() != nq {
        return Err(SymmetryError::DimensionMismatch { what: "matrix stack", expected: nq, actual: stack.len() });
    }
    for matrix in stack.iter() {
        check_square(matrix, crystal.num_atoms())?;
    }

    let dim = 3 * crystal.num_atoms();
    let crystal_stack: Vec<Dynmat> = stack.iter()
        .map(|m| blocks::cart_to_crystal(m, crystal.lattice()))
        .collect();
    let mut sums = vec![Dynmat::zeros(dim, dim); nq];
    let mut counts = vec![0usize; nq];

    for (i, q) in members.iter().enumerate() {
        let star = table.star_of(q)?;
        if star.len() != nq {
            return Err(SymmetryError::StarSizeMismatch { q: *q, expected: star.len(), actual: nq });
        }

        let k = crystal.q_to_frac(q);
        for mapped in &ops {
            let image = crystal.q_from_frac(&mapped.op.rot().transform_recip_frac(&k));
            let matches: Vec<usize> = (0..nq)
                .filter(|&j| table.q_equivalent(&image, &members[j]))
                .collect();
            let j = match matches[..] {
                [j] => j,
                _ => return Err(SymmetryError::AmbiguousStarMatch { q: image }),
            };
            sums[j] += rotate_dynmat(&crystal_stack[i], crystal, mapped, q);
            counts[j] += 1;
        }
    }
    trace!("star of {} members averaged over {} operations", nq, ops.len());

    for (matrix, sum, count) in izip!(stack, sums, counts) {
        let mean = sum / Complex64::new(count as f64, 0.0);
        *matrix = blocks::crystal_to_cart(&mean, crystal.lattice());
    }
    Ok(())
}

/// Symmetrize a cartesian rank-2 tensor under the whole space group.
///
/// When `error` is supplied, it holds standard errors of the elements of
/// `tensor`, and is replaced by the errors of the symmetrized elements:
/// each output element gets `sqrt(Σ err²) / count` over the input elements
/// that contribute to it, or zero if none do.
pub fn symmetrize_tensor<B: SymmetryBackend>(
    table: &SymmetryTable<'_, B>,
    tensor: &mut M33,
    error: Option<&mut M33>,
) -> Result<()>
{
    table.require_discovered()?;
    let ops = table.crystal_operations();
    let lattice = table.crystal().lattice();
    let apply = |t: &M33| {
        let crystal = blocks::tensor_to_crystal(t, lattice);
        blocks::tensor_to_cart(&table.backend().symmetrize_tensor(&crystal, ops), lattice)
    };

    if let Some(error) = error {
        let mut sum_sq = [[0.0; 3]; 3];
        let mut count = [[0usize; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                let mut indicator = M33::zero();
                indicator[i][j] = 1.0;
                let image = apply(&indicator);
                for k in 0..3 {
                    for l in 0..3 {
                        if image[k][l].abs() > MASK_TOL {
                            sum_sq[k][l] += error[i][j] * error[i][j];
                            count[k][l] += 1;
                        }
                    }
                }
            }
        }
        *error = M33::from_fn(|k, l| match count[k][l] {
            0 => 0.0,
            c => sum_sq[k][l].sqrt() / c as f64,
        });
    }

    *tensor = apply(&*tensor);
    Ok(())
}

/// Average cartesian per-atom vectors over the little group:
/// `u'_{g(b)} = (1/n) Σ_g R_g u_b`.
///
/// Translations play no part, so this suits displacements and forces, not
/// positions.
pub fn symmetrize_vector<B: SymmetryBackend>(
    table: &SymmetryTable<'_, B>,
    vectors: &mut [V3],
) -> Result<()>
{
    let mappings = table.little_group_mappings()?;
    let crystal = table.crystal();
    if vectors.len() != crystal.num_atoms() {
        return Err(SymmetryError::DimensionMismatch {
            what: "vector field", expected: crystal.num_atoms(), actual: vectors.len(),
        });
    }

    let lattice = crystal.lattice();
    let fracs: Vec<V3> = vectors.iter().map(|v| v / lattice).collect();
    let symmetrized = table.backend().symmetrize_vector(&fracs, table.operations(), mappings);
    for (v, frac) in izip!(vectors, symmetrized) {
        *v = frac * lattice;
    }
    Ok(())
}

/// Cartesian positions averaged over their space group images.
///
/// Each image `W x_b + t` is moved by a lattice vector onto `x_{g(b)}` before
/// averaging, so the result stays close to the input.
pub fn symmetrize_positions<B>(table: &SymmetryTable<'_, B>) -> Result<Vec<V3>>
{
    let mappings = table.crystal_mappings()?;
    let ops = table.crystal_operations();
    let crystal = table.crystal();
    let fracs = crystal.fracs();

    let mut sums = vec![V3::zero(); fracs.len()];
    for (op, perm) in izip!(ops, mappings) {
        for (b, frac) in fracs.iter().enumerate() {
            let dest = perm.permute_index(b);
            let image = op.transform_frac(frac);
            sums[dest] += image - (image - fracs[dest]).map(f64::round);
        }
    }
    let n = ops.len() as f64;
    Ok(sums.into_iter().map(|v| (v / n) * crystal.lattice()).collect())
}
