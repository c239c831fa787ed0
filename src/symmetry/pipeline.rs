/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Full symmetrization of a set of dynamical matrices on a q-point grid.

use crate::{Result, SymmetryError, SymmetryBackend, SymmetryTable};
use crate::{AsrMode, Axis, impose_acoustic_sum_rule};
use crate::{symmetrize_dynamical_matrix, symmetrize_across_star};
use crate::blocks::Dynmat;

use phonsym_array_types::V3;

use std::time::Instant;

/// Symmetrize dynamical matrices given star by star.
///
/// `matrices` is star-major: the matrices of `stars[0]` in member order,
/// then those of `stars[1]`, and so on. Each matrix is first symmetrized
/// under the little group of its q-point (after imposing `asr` if it is at
/// Γ), then each star is made internally consistent.
///
/// The table is left discovered at Γ.
pub fn symmetrize_fc_q<B: SymmetryBackend>(
    table: &mut SymmetryTable<'_, B>,
    matrices: &mut [Dynmat],
    stars: &[Vec<V3>],
    asr: AsrMode,
    axis: Axis,
) -> Result<()>
{
    let num_q: usize = stars.iter().map(Vec::len).sum();
    if matrices.len() != num_q {
        return Err(SymmetryError::DimensionMismatch { what: "q-point count", expected: num_q, actual: matrices.len() });
    }

    let start = Instant::now();
    let qs = stars.iter().flatten();
    for (q, matrix) in qs.zip(matrices.iter_mut()) {
        table.discover_for_q_point(&q.0, false)?;
        if asr != AsrMode::No && table.q_equivalent(q, &V3::zero()) {
            impose_acoustic_sum_rule(table, matrix, asr, axis, None)?;
        }
        symmetrize_dynamical_matrix(table, matrix, &q.0)?;
    }
    trace!("little group symmetrization of {} q-points: {:?}", num_q, start.elapsed());

    let start = Instant::now();
    table.discover_gamma()?;
    let mut offset = 0;
    for star in stars {
        let end = offset + star.len();
        symmetrize_across_star(table, &mut matrices[offset..end], star)?;
        offset = end;
    }
    trace!("star symmetrization of {} stars: {:?}", stars.len(), start.elapsed());
    Ok(())
}
