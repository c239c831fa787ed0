/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::FailResult;
use crate::modes::{self, Modes};

use phonsym_array_types::V3;
use phonsym_structure::Structure;
use phonsym_symmetry::{Dynmat, SymmetryTable, AsrMode, Axis, symmetrize_fc_q};

/// Dynamical matrices of a structure on a set of q-point stars.
///
/// The matrices are stored star-major: all members of the first star in
/// order, then the second star, and so on.
#[derive(Debug, Clone)]
pub struct Phonons {
    structure: Structure,
    q_stars: Vec<Vec<V3>>,
    dynmats: Vec<Dynmat>,
}

/// Tolerance on cartesian q-point components when comparing q-points.
const Q_TOL: f64 = 1e-6;

impl Phonons {
    /// Γ-only phonons with a zero dynamical matrix.
    pub fn new_gamma(structure: Structure) -> FailResult<Phonons>
    {
        let dim = 3 * structure.num_atoms();
        Phonons::from_parts(structure, vec![vec![V3::zero()]], vec![Dynmat::zeros(dim, dim)])
    }

    pub fn from_parts(structure: Structure, q_stars: Vec<Vec<V3>>, dynmats: Vec<Dynmat>) -> FailResult<Phonons>
    {
        ensure!(structure.has_unit_cell(), "phonons require a structure with a unit cell");
        ensure!(structure.num_atoms() > 0, "phonons require at least one atom");
        ensure!(!q_stars.is_empty(), "phonons require at least one q-point");
        ensure!(q_stars.iter().all(|star| !star.is_empty()), "empty q-point star");

        let num_q: usize = q_stars.iter().map(Vec::len).sum();
        ensure!(
            dynmats.len() == num_q,
            "got {} dynamical matrices for {} q-points", dynmats.len(), num_q,
        );
        let dim = 3 * structure.num_atoms();
        for (iq, dynmat) in dynmats.iter().enumerate() {
            ensure!(
                dynmat.shape() == (dim, dim),
                "dynamical matrix {} has shape {:?}, expected {:?}", iq, dynmat.shape(), (dim, dim),
            );
        }
        Ok(Phonons { structure, q_stars, dynmats })
    }

    pub fn structure(&self) -> &Structure { &self.structure }
    pub fn q_stars(&self) -> &[Vec<V3>] { &self.q_stars }
    pub fn num_stars(&self) -> usize { self.q_stars.len() }
    pub fn dynmats(&self) -> &[Dynmat] { &self.dynmats }
    pub fn num_q_points(&self) -> usize { self.dynmats.len() }

    /// All q-points, star-major (the order of `dynmats`).
    pub fn q_points(&self) -> Vec<V3>
    { self.q_stars.iter().flatten().cloned().collect() }

    /// `None` when `iq` is out of range.
    pub fn dynmat(&self, iq: usize) -> Option<&Dynmat>
    { self.dynmats.get(iq) }

    pub fn set_dynmat(&mut self, iq: usize, dynmat: Dynmat) -> FailResult<()>
    {
        ensure!(iq < self.num_q_points(), "q-point index {} out of range", iq);
        ensure!(dynmat.shape() == self.dynmats[iq].shape(), "dynamical matrix has the wrong shape");
        self.dynmats[iq] = dynmat;
        Ok(())
    }

    /// Whether the only q-point is Γ.
    pub fn is_gamma_only(&self) -> bool
    { self.num_q_points() == 1 && self.q_stars[0][0].norm() < Q_TOL }

    /// Frequencies (ascending) and polarization vectors at a q-point.
    pub fn diagonalize_at(&self, iq: usize) -> FailResult<Modes>
    {
        ensure!(iq < self.num_q_points(), "q-point index {} out of range", iq);
        let masses = modes::dof_masses(&self.structure)?;
        Ok(modes::diagonalize(&modes::mass_scaled(&self.dynmats[iq], &masses)))
    }

    /// Real modes at Γ, requiring every mode past the acoustic ones to be stable.
    pub(crate) fn stable_gamma_modes(&self) -> FailResult<Modes<f64>>
    {
        ensure!(self.is_gamma_only(), "only implemented for Γ-point phonons");
        let masses = modes::dof_masses(&self.structure)?;
        let real = self.dynmats[0].map(|x| x.re);
        let modes = modes::diagonalize(&modes::mass_scaled(&real, &masses));
        if let Some(&w) = modes.frequencies.iter().skip(modes::NUM_ACOUSTIC).find(|&&w| w <= 0.0) {
            bail!("non-acoustic mode with frequency {} Ry; the structure is unstable", w);
        }
        Ok(modes)
    }

    /// Whether `other` describes the same atoms on the same q-points.
    pub fn check_compatibility(&self, other: &Phonons) -> bool
    {
        self.structure.num_atoms() == other.structure.num_atoms()
            && self.structure.species() == other.structure.species()
            && self.num_q_points() == other.num_q_points()
            && izip!(self.q_points(), other.q_points()).all(|(a, b)| (a - b).norm() < Q_TOL)
    }

    /// Symmetrize every dynamical matrix under the space group, imposing
    /// the acoustic sum rule at Γ.
    pub fn symmetrize(&mut self, threshold: f64, asr: AsrMode, axis: Axis) -> FailResult<()>
    {
        let mut table = SymmetryTable::new(&self.structure, threshold)?;
        symmetrize_fc_q(&mut table, &mut self.dynmats, &self.q_stars, asr, axis)?;
        info!("Symmetrized {} dynamical matrices in {} stars.", self.dynmats.len(), self.q_stars.len());
        Ok(())
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::testing;
    use phonsym_symmetry::blocks;
    use phonsym_structure::CoordsKind;
    use num_complex::Complex64;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn construction_checks() {
        let structure = testing::cscl();
        let gamma = Phonons::new_gamma(structure.clone()).unwrap();
        assert!(gamma.is_gamma_only());
        assert_eq!(gamma.dynmat(0).unwrap().shape(), (6, 6));
        assert!(gamma.dynmat(1).is_none());

        assert!(Phonons::from_parts(structure.clone(), vec![vec![V3::zero()]], vec![]).is_err());
        assert!(Phonons::from_parts(structure.clone(), vec![vec![]], vec![]).is_err());
        assert!(Phonons::from_parts(structure.clone(), vec![vec![V3::zero()]], vec![Dynmat::zeros(3, 3)]).is_err());

        let molecule = Structure::molecule(structure.to_carts(), structure.species().to_vec());
        assert!(Phonons::new_gamma(molecule).is_err());
    }

    #[test]
    fn cscl_frequencies() {
        let phonons = testing::cscl_phonons();
        let modes = phonons.diagonalize_at(0).unwrap();
        let w = testing::cscl_optical_frequency();
        assert_close!(abs=1e-8, modes.frequencies[..3], [0.0; 3][..]);
        assert_close!(rel=1e-10, modes.frequencies[3..], [w; 3][..]);

        let overlap = modes.polarizations.adjoint() * &modes.polarizations;
        for i in 0..6 {
            for j in 0..6 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_close!(abs=1e-10, overlap[(i, j)].re, expected);
            }
        }
    }

    #[test]
    fn compatibility() {
        let a = testing::cscl_phonons();
        let mut b = a.clone();
        assert!(a.check_compatibility(&b));

        b.q_stars[0][0] = V3([0.1, 0.0, 0.0]);
        assert!(!a.check_compatibility(&b));

        let cscl = testing::cscl();
        let relabeled = Structure::new(
            cscl.lattice().unwrap().clone(),
            CoordsKind::Carts(cscl.to_carts()),
            vec!["Cl", "Cs"],
        );
        let c = Phonons::new_gamma(relabeled).unwrap();
        assert!(!a.check_compatibility(&c));
    }

    #[test]
    fn symmetrize_cleans_noise() {
        let mut phonons = testing::cscl_phonons();
        let exact = phonons.dynmat(0).unwrap().clone();

        let mut rng = StdRng::seed_from_u64(2);
        let noise = Dynmat::from_fn(6, 6, |_, _| Complex64::new(rng.gen_range(-1e-4..1e-4), 0.0));
        phonons.set_dynmat(0, &exact + noise).unwrap();
        phonons.symmetrize(1e-5, AsrMode::Crystal, Axis::X).unwrap();

        let d = phonons.dynmat(0).unwrap();
        for a in 0..2 {
            for b in 0..2 {
                let block = blocks::block(d, a, b);
                for i in 0..3 {
                    for j in 0..3 {
                        if i != j {
                            assert!(block[i][j].norm() < 1e-12);
                        }
                    }
                    assert_close!(abs=1e-12, block[i][i], block[0][0]);
                }
            }
            // translations cost nothing
            let sum = blocks::block(d, a, 0) + blocks::block(d, a, 1);
            assert!(sum[0][0].norm() < 1e-12);
        }
        assert_close!(abs=5e-4, d[(0, 0)].re, exact[(0, 0)].re);
    }
}
