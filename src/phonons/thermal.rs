/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Harmonic displacement statistics at Γ.

use crate::{FailResult, Phonons};
use crate::consts::{A_TO_BOHR, K_TO_RY};
use crate::modes::{self, NUM_ACOUSTIC};

use phonsym_array_types::V3;
use phonsym_structure::Structure;

use nalgebra::{DMatrix, DVector};
use ordered_float::OrderedFloat;
use std::f64::consts::PI;

/// Bose-Einstein occupation of a mode with frequency in Ry, at a temperature in K.
pub fn bose_occupation(frequency: f64, temperature: f64) -> f64
{
    if temperature == 0.0 {
        return 0.0;
    }
    1.0 / (f64::exp(frequency / (K_TO_RY * temperature)) - 1.0)
}

impl Phonons {
    /// The inverse of the displacement covariance matrix,
    /// `Υ_ab = sqrt(m_a m_b) Σ_μ 2ω_μ / (1 + 2n_μ) e_μa e_μb`,
    /// summed over all modes but the three acoustic ones.
    ///
    /// Only defined for Γ-point phonons without unstable modes.
    pub fn upsilon_matrix(&self, temperature: f64) -> FailResult<DMatrix<f64>>
    {
        ensure!(temperature >= 0.0, "temperature must be non-negative (got {})", temperature);
        let modes = self.stable_gamma_modes()?;
        let masses = modes::dof_masses(self.structure())?;

        let n = modes.num_modes();
        let mut upsilon = DMatrix::zeros(n, n);
        for mu in NUM_ACOUSTIC..n {
            let w = modes.frequencies[mu];
            let factor = 2.0 * w / (1.0 + 2.0 * bose_occupation(w, temperature));
            let e = modes.polarizations.column(mu);
            upsilon += e * e.transpose() * factor;
        }
        Ok(modes::mass_unscaled(&upsilon, &masses))
    }

    /// Probability density of a displacement (in bohr) at a temperature,
    /// `sqrt(det(Υ/2π)) exp(-uᵀΥu / 2)`.
    ///
    /// The determinant skips the three smallest eigenvalues of `Υ`, which
    /// belong to the acoustic modes. With `normalize = false` only the
    /// exponential is returned.
    pub fn probability(&self, displacement: &[V3], temperature: f64, normalize: bool) -> FailResult<f64>
    {
        ensure!(
            displacement.len() == self.structure().num_atoms(),
            "got {} displacements for {} atoms", displacement.len(), self.structure().num_atoms(),
        );
        let upsilon = self.upsilon_matrix(temperature)?;
        Ok(gaussian_density(&upsilon, displacement, normalize))
    }

    /// Importance sampling weight of a structure drawn from `reference` at `T0`,
    /// if it were drawn from `self` at `temperature` instead.
    ///
    /// Displacements are measured from each set of phonons' own structure.
    pub fn ratio_probability(
        &self,
        structure: &Structure,
        temperature: f64,
        reference: &Phonons,
        reference_temperature: f64,
    ) -> FailResult<f64>
    {
        let to_bohr = |disp: Vec<V3>| disp.into_iter().map(|v| v * A_TO_BOHR).collect::<Vec<_>>();
        let disp = to_bohr(self.structure().displacement_to(structure)?);
        let ref_disp = to_bohr(reference.structure().displacement_to(structure)?);

        let numerator = self.probability(&disp, temperature, true)?;
        let denominator = reference.probability(&ref_disp, reference_temperature, true)?;
        trace!("ratio probability: {:e} / {:e}", numerator, denominator);
        Ok(numerator / denominator)
    }
}

fn gaussian_density(upsilon: &DMatrix<f64>, displacement: &[V3], normalize: bool) -> f64
{
    let u = DVector::from_iterator(upsilon.nrows(), displacement.iter().flat_map(|v| v.0.to_vec()));
    let weight = f64::exp(-0.5 * u.dot(&(upsilon * &u)));
    if !normalize {
        return weight;
    }

    let mut vals: Vec<f64> = upsilon.clone().symmetric_eigenvalues().iter().cloned().collect();
    vals.sort_by_key(|v| OrderedFloat(v.abs()));
    let det: f64 = vals.iter().skip(NUM_ACOUSTIC).map(|v| v / (2.0 * PI)).product();
    f64::sqrt(det) * weight
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn optical_mode_stiffness() {
        let phonons = testing::cscl_phonons();
        let w = testing::cscl_optical_frequency();
        let modes = phonons.stable_gamma_modes().unwrap();
        let masses = modes::dof_masses(phonons.structure()).unwrap();

        let e = modes.polarizations.column(4);
        let u = DVector::from_fn(6, |i, _| e[i] / masses[i].sqrt());

        let cold = phonons.upsilon_matrix(0.0).unwrap();
        assert_close!(rel=1e-8, u.dot(&(&cold * &u)), 2.0 * w);

        let hot = phonons.upsilon_matrix(300.0).unwrap();
        let expected = 2.0 * w / (1.0 + 2.0 * bose_occupation(w, 300.0));
        assert_close!(rel=1e-8, u.dot(&(&hot * &u)), expected);
        assert!(expected < 2.0 * w);

        // translations are free
        let t = DVector::from_fn(6, |i, _| if i % 3 == 1 { 1.0 } else { 0.0 });
        assert!((&cold * &t).norm() < 1e-10 * cold.norm());
    }

    #[test]
    fn gaussian_weights() {
        let phonons = testing::cscl_phonons();
        let zero = vec![V3::zero(); 2];
        let disp = vec![V3([0.01, 0.0, 0.0]), V3([-0.02, 0.0, 0.01])];
        let shifted: Vec<V3> = disp.iter().map(|v| v + V3([0.3, -0.1, 0.2])).collect();

        let peak = phonons.probability(&zero, 0.0, true).unwrap();
        let p = phonons.probability(&disp, 0.0, true).unwrap();
        let weight = phonons.probability(&disp, 0.0, false).unwrap();
        assert!(peak > 0.0);
        assert_eq!(phonons.probability(&zero, 0.0, false).unwrap(), 1.0);
        assert!(weight < 1.0);
        assert_close!(rel=1e-10, p / peak, weight);

        // uniform translation doesn't change anything
        assert_close!(rel=1e-8, phonons.probability(&shifted, 0.0, true).unwrap(), p);

        assert!(phonons.probability(&zero[..1], 0.0, true).is_err());
        assert!(phonons.upsilon_matrix(-1.0).is_err());
    }

    #[test]
    fn ratio_of_identical_ensembles() {
        let phonons = testing::cscl_phonons();
        let mut displaced = phonons.structure().clone();
        let carts: Vec<V3> = displaced.carts().iter().map(|v| v + V3([0.01, -0.005, 0.0])).collect();
        displaced.set_carts(carts);

        let ratio = phonons.ratio_probability(&displaced, 100.0, &phonons, 100.0).unwrap();
        assert_close!(rel=1e-12, ratio, 1.0);
    }

    #[test]
    fn requires_gamma() {
        let phonons = testing::cscl_phonons();
        let at_x = Phonons::from_parts(
            phonons.structure().clone(),
            vec![vec![V3([0.1, 0.0, 0.0])]],
            phonons.dynmats().to_vec(),
        ).unwrap();
        assert!(at_x.upsilon_matrix(0.0).is_err());
    }
}
