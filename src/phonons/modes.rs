/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::FailResult;

use phonsym_structure::Structure;

use nalgebra::{ComplexField, DMatrix};
use num_complex::Complex64;
use itertools::Itertools;
use ordered_float::OrderedFloat;

/// Modes at Γ that are discarded as uniform translations.
pub(crate) const NUM_ACOUSTIC: usize = 3;

/// Frequencies and polarization vectors at one q-point.
#[derive(Debug, Clone)]
pub struct Modes<T = Complex64> {
    /// Ascending. Negative values stand for imaginary frequencies.
    pub frequencies: Vec<f64>,
    /// Column `μ` is the (orthonormal) eigenvector of mode `μ` of the
    /// mass-scaled dynamical matrix.
    pub polarizations: DMatrix<T>,
}

impl<T> Modes<T> {
    pub fn num_modes(&self) -> usize
    { self.frequencies.len() }
}

pub fn eigenvalue_to_frequency(val: f64) -> f64 {
    f64::sqrt(f64::abs(val)) * f64::signum(val)
}

/// Masses repeated for each cartesian component.
pub(crate) fn dof_masses(structure: &Structure) -> FailResult<Vec<f64>>
{
    let masses = structure.masses()?;
    Ok(masses.into_iter().flat_map(|m| vec![m; 3]).collect())
}

/// `D_ij / sqrt(m_i m_j)`
pub(crate) fn mass_scaled<T>(matrix: &DMatrix<T>, masses: &[f64]) -> DMatrix<T>
where T: ComplexField<RealField = f64>,
{
    DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |i, j| {
        matrix[(i, j)].clone().unscale(f64::sqrt(masses[i] * masses[j]))
    })
}

/// Undoes `mass_scaled`.
pub(crate) fn mass_unscaled<T>(matrix: &DMatrix<T>, masses: &[f64]) -> DMatrix<T>
where T: ComplexField<RealField = f64>,
{
    DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |i, j| {
        matrix[(i, j)].clone().scale(f64::sqrt(masses[i] * masses[j]))
    })
}

/// Diagonalize the Hermitian part of a mass-scaled dynamical matrix.
pub(crate) fn diagonalize<T>(matrix: &DMatrix<T>) -> Modes<T>
where T: ComplexField<RealField = f64>,
{
    let n = matrix.nrows();
    let hermitian = (matrix + matrix.adjoint()).unscale(2.0);
    let eigen = hermitian.symmetric_eigen();

    let frequencies: Vec<f64> = eigen.eigenvalues.iter().map(|&val| eigenvalue_to_frequency(val)).collect();
    let order: Vec<usize> = (0..n).sorted_by_key(|&i| OrderedFloat(frequencies[i])).collect();
    Modes {
        frequencies: order.iter().map(|&i| frequencies[i]).collect(),
        polarizations: DMatrix::from_fn(n, n, |row, col| eigen.eigenvectors[(row, order[col])].clone()),
    }
}
