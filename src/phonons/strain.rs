/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{FailResult, Phonons, bose_occupation};
use crate::modes::{self, NUM_ACOUSTIC};

use phonsym_array_types::V3;
use phonsym_structure::Lattice;
use phonsym_symmetry::Dynmat;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use itertools::Itertools;
use ordered_float::OrderedFloat;

const MAX_BISECTIONS: usize = 200;

impl Phonons {
    /// Γ-point phonons of the same structure after a change of cell.
    ///
    /// The polarization vectors are carried over in crystal coordinates and
    /// used to build the displacement covariance on the new cell, which is
    /// then diagonalized to give new (orthonormal) modes and frequencies.
    pub fn strained(&self, new_cell: &Lattice, temperature: f64) -> FailResult<Phonons>
    {
        ensure!(temperature >= 0.0, "temperature must be non-negative (got {})", temperature);
        let modes = self.stable_gamma_modes()?;
        let old_cell = self.structure().require_lattice()?;
        let masses = modes::dof_masses(self.structure())?;

        let n = modes.num_modes();
        let mut covariance = DMatrix::<f64>::zeros(n, n);
        for mu in NUM_ACOUSTIC..n {
            let e = modes.polarizations.column(mu);
            let strained = DVector::from_iterator(n, (0..n / 3).flat_map(|atom| {
                let v = V3([e[3 * atom], e[3 * atom + 1], e[3 * atom + 2]]);
                ((v / old_cell) * new_cell).0.to_vec()
            }));
            let factor = covariance_factor(modes.frequencies[mu], temperature);
            covariance += &strained * strained.transpose() * factor;
        }

        let eigen = covariance.symmetric_eigen();
        let order: Vec<usize> = (0..n).sorted_by_key(|&i| OrderedFloat(eigen.eigenvalues[i])).collect();
        let mut scaled = DMatrix::<f64>::zeros(n, n);
        for &i in &order[NUM_ACOUSTIC..] {
            let w = frequency_from_covariance(eigen.eigenvalues[i], temperature);
            let e = eigen.eigenvectors.column(i);
            scaled += e * e.transpose() * (w * w);
        }
        let dynmat: Dynmat = modes::mass_unscaled(&scaled, &masses).map(|x| Complex64::new(x, 0.0));

        let structure = self.structure().with_lattice(new_cell)?;
        Phonons::from_parts(structure, self.q_stars().to_vec(), vec![dynmat])
    }
}

/// Variance of a mode's normal coordinate, `(1 + 2n) / 2ω`.
fn covariance_factor(frequency: f64, temperature: f64) -> f64
{ (1.0 + 2.0 * bose_occupation(frequency, temperature)) / (2.0 * frequency) }

/// Inverts `covariance_factor` for the frequency.
fn frequency_from_covariance(factor: f64, temperature: f64) -> f64
{
    let cold = 1.0 / (2.0 * factor);
    if temperature == 0.0 {
        return cold;
    }

    // decreasing in the frequency, and at least as large as at T = 0
    let (mut lo, mut hi) = (cold, 2.0 * cold);
    while covariance_factor(hi, temperature) > factor {
        hi *= 2.0;
    }
    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if covariance_factor(mid, temperature) > factor {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 1e-15 * hi {
            break;
        }
    }
    0.5 * (lo + hi)
}
