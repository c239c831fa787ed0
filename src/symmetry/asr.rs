/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Acoustic sum rules.

use crate::{Result, SymmetryError, SymmetryBackend, SymmetryTable};
use crate::blocks::{self, Dynmat};

use phonsym_array_types::{V3, M33};

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AsrMode {
    /// Correct the self-interaction blocks so that every row sums to zero.
    Simple,
    /// Project out the three uniform translations.
    Crystal,
    /// Also project out the rigid rotation about one axis.
    OneDim,
    /// Also project out all three rigid rotations.
    ZeroDim,
    /// Like `Crystal`, but effective charges are never touched.
    Custom,
    No,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis { X, Y, Z }

impl Default for AsrMode {
    fn default() -> Self { AsrMode::Simple }
}

impl Default for Axis {
    fn default() -> Self { Axis::X }
}

impl Axis {
    pub fn index(self) -> usize
    { match self { Axis::X => 0, Axis::Y => 1, Axis::Z => 2 } }

    pub fn unit(self) -> V3
    { V3::axis_unit(self.index()) }
}

impl AsrMode {
    const NAMES: &'static [(&'static str, AsrMode)] = &[
        ("simple", AsrMode::Simple),
        ("crystal", AsrMode::Crystal),
        ("one-dim", AsrMode::OneDim),
        ("zero-dim", AsrMode::ZeroDim),
        ("custom", AsrMode::Custom),
        ("no", AsrMode::No),
    ];

    pub fn name(self) -> &'static str
    {
        AsrMode::NAMES.iter()
            .find(|&&(_, mode)| mode == self)
            .map(|&(name, _)| name)
            .expect("(BUG) every mode has a name")
    }
}

impl FromStr for AsrMode {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<AsrMode>
    {
        AsrMode::NAMES.iter()
            .find(|&&(name, _)| name == s)
            .map(|&(_, mode)| mode)
            .ok_or_else(|| SymmetryError::InvalidAsrMode { name: s.to_string() })
    }
}

impl fmt::Display for AsrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { f.write_str(self.name()) }
}

impl FromStr for Axis {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Axis>
    {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(SymmetryError::InvalidAxis { name: s.to_string() }),
        }
    }
}

/// Impose an acoustic sum rule on a force constant matrix, in place.
///
/// `force_constants` is `3N x 3N` in cartesian blocks. When supplied,
/// `effective_charges` holds one cartesian tensor per atom, and is corrected
/// in place so that the charges sum to zero, except in `Custom` mode, which
/// only ever touches the force constants. `No` does nothing.
///
/// This does not require the table to be discovered.
pub fn impose_acoustic_sum_rule<B: SymmetryBackend>(
    table: &SymmetryTable<'_, B>,
    force_constants: &mut Dynmat,
    mode: AsrMode,
    axis: Axis,
    effective_charges: Option<&mut [M33]>,
) -> Result<()>
{
    let crystal = table.crystal();
    let n = crystal.num_atoms();
    check_square(force_constants, n)?;
    if let Some(charges) = &effective_charges {
        if charges.len() != n {
            return Err(SymmetryError::DimensionMismatch {
                what: "effective charges", expected: n, actual: charges.len(),
            });
        }
    }

    match mode {
        AsrMode::No => {},
        _ => {
            let (fc, charges) = table.backend().impose_sum_rule(
                force_constants, mode, axis, crystal.carts(),
                effective_charges.as_ref().map(|c| &c[..]),
            );
            *force_constants = fc;
            if let (Some(dest), Some(charges)) = (effective_charges, charges) {
                dest.copy_from_slice(&charges);
            }
        },
    }
    Ok(())
}

pub(crate) fn check_square(m: &Dynmat, num_atoms: usize) -> Result<()>
{
    let expected = 3 * num_atoms;
    for &actual in &[m.nrows(), m.ncols()] {
        if actual != expected {
            return Err(SymmetryError::DimensionMismatch { what: "dynamical matrix", expected, actual });
        }
    }
    Ok(())
}

/// `F[aα, aβ] -= Σ_b F[aα, bβ]`.
pub(crate) fn simple(fc: &Dynmat) -> Dynmat
{
    let n = blocks::num_atoms_of(fc);
    let mut out = fc.clone();
    for a in 0..n {
        let row_sum = (0..n)
            .map(|b| blocks::block(fc, a, b))
            .fold(M33::zero(), |acc, block| acc + block);
        let corrected = blocks::block(fc, a, a) - row_sum;
        blocks::set_block(&mut out, a, a, &corrected);
    }
    out
}

pub(crate) fn subtract_mean_charge(charges: &[M33]) -> Vec<M33>
{
    let mean = charges.iter().fold(M33::zero(), |acc, z| acc + z) / charges.len() as f64;
    charges.iter().map(|z| z - mean).collect()
}

/// An orthonormal basis for the uniform translations and for rigid rotations
/// about the given axes, as `3N` vectors.
///
/// Rotations that are degenerate with the translations (or with each other,
/// as happens for linear molecules) are dropped.
pub(crate) fn rigid_motions(carts: &[V3], rotation_axes: &[Axis]) -> Vec<DVector<f64>>
{
    let n = carts.len();
    let mut candidates = vec![];
    for d in 0..3 {
        candidates.push(DVector::from_fn(3 * n, |i, _| if i % 3 == d { 1.0 } else { 0.0 }));
    }
    for axis in rotation_axes {
        let unit = axis.unit();
        let motion: Vec<f64> = carts.iter().flat_map(|x| unit.cross(x).0.to_vec()).collect();
        candidates.push(DVector::from_vec(motion));
    }

    // Gram-Schmidt
    let mut basis: Vec<DVector<f64>> = vec![];
    for mut v in candidates {
        let scale = v.norm();
        for b in &basis {
            let overlap = b.dot(&v);
            v -= b * overlap;
        }
        let norm = v.norm();
        if norm > 1e-8 * scale.max(1.0) {
            basis.push(v / norm);
        }
    }
    basis
}

/// `P F P` with `P = I - Σ v vᵀ` for an orthonormal set of `v`.
pub(crate) fn project_out(fc: &Dynmat, basis: &[DVector<f64>]) -> Dynmat
{
    let dim = fc.nrows();
    let mut projector = DMatrix::<f64>::identity(dim, dim);
    for v in basis {
        projector -= v * v.transpose();
    }
    let projector = projector.map(|x| Complex64::new(x, 0.0));
    &projector * fc * &projector
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::testing;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn random_symmetric(n: usize, rng: &mut StdRng) -> Dynmat
    {
        let m = DMatrix::<f64>::from_fn(3 * n, 3 * n, |_, _| rng.gen_range(-1.0..1.0));
        (&m + m.transpose()).map(|x| Complex64::new(x, 0.0))
    }

    fn translation(n: usize, d: usize) -> DVector<Complex64>
    { DVector::from_fn(3 * n, |i, _| Complex64::new(if i % 3 == d { 1.0 } else { 0.0 }, 0.0)) }

    fn max_norm(v: &DVector<Complex64>) -> f64
    { v.iter().map(|x| x.norm()).fold(0.0, f64::max) }

    #[test]
    fn names_roundtrip() {
        for &(name, mode) in AsrMode::NAMES {
            assert_eq!(name.parse::<AsrMode>().unwrap(), mode);
            assert_eq!(mode.to_string(), name);
        }
        match "sum-rule".parse::<AsrMode>() {
            Err(SymmetryError::InvalidAsrMode { name }) => assert_eq!(name, "sum-rule"),
            r => panic!("unexpected: {:?}", r),
        }
    }

    #[test]
    fn bad_axis_names() {
        assert_eq!("z".parse::<Axis>().unwrap(), Axis::Z);
        match "w".parse::<Axis>() {
            Err(e @ SymmetryError::InvalidAxis { .. }) => assert!(e.to_string().contains("'w'")),
            r => panic!("unexpected: {:?}", r),
        }
    }

    fn cscl_charges() -> Vec<M33>
    { vec![M33::eye() * 2.0, M33::eye() * -1.5] }

    // returns the corrected matrix and charges
    fn impose_on_cscl(mode: AsrMode, fc: &Dynmat) -> (Dynmat, Vec<M33>)
    {
        let structure = testing::cscl();
        let table = SymmetryTable::new(&structure, 1e-5).unwrap();
        let mut fc = fc.clone();
        let mut charges = cscl_charges();
        impose_acoustic_sum_rule(&table, &mut fc, mode, Axis::Z, Some(&mut charges)).unwrap();
        (fc, charges)
    }

    #[test]
    fn modes_through_the_table() {
        let mut rng = StdRng::seed_from_u64(4);
        let original = random_symmetric(2, &mut rng);
        let unchanged = cscl_charges();

        let (fc, charges) = impose_on_cscl(AsrMode::No, &original);
        assert_eq!(fc, original);
        assert_close!(abs=0.0, charges, unchanged);

        for &mode in &[AsrMode::Simple, AsrMode::Crystal, AsrMode::Custom] {
            let (fc, _) = impose_on_cscl(mode, &original);
            for d in 0..3 {
                assert!(max_norm(&(&fc * translation(2, d))) < 1e-12, "{}", mode);
            }
        }

        // custom only touches the force constants
        let (_, charges) = impose_on_cscl(AsrMode::Custom, &original);
        assert_close!(abs=0.0, charges, unchanged);

        for &mode in &[AsrMode::Simple, AsrMode::Crystal] {
            let (_, charges) = impose_on_cscl(mode, &original);
            assert_close!(abs=1e-12, charges[0], M33::eye() * 1.75);
            assert_close!(abs=1e-12, charges[0] + charges[1], M33::zero());
        }
    }

    #[test]
    fn dimension_mismatches() {
        let structure = testing::cscl();
        let table = SymmetryTable::new(&structure, 1e-5).unwrap();

        let mut fc = Dynmat::zeros(6, 6);
        let mut charges = vec![M33::eye()];
        match impose_acoustic_sum_rule(&table, &mut fc, AsrMode::Crystal, Axis::X, Some(&mut charges)) {
            Err(SymmetryError::DimensionMismatch { what: "effective charges", expected: 2, actual: 1 }) => {},
            r => panic!("unexpected: {:?}", r),
        }

        let mut fc = Dynmat::zeros(3, 3);
        match impose_acoustic_sum_rule(&table, &mut fc, AsrMode::Crystal, Axis::X, None) {
            Err(SymmetryError::DimensionMismatch { what: "dynamical matrix", expected: 6, actual: 3 }) => {},
            r => panic!("unexpected: {:?}", r),
        }
    }

    #[test]
    fn simple_rows_sum_to_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let fc = simple(&random_symmetric(3, &mut rng));
        for d in 0..3 {
            assert!(max_norm(&(&fc * translation(3, d))) < 1e-12);
        }
    }

    #[test]
    fn crystal_projection_kills_translations() {
        let mut rng = StdRng::seed_from_u64(2);
        let carts: Vec<V3> = (0..4).map(|_| V3(rng.gen())).collect();
        let fc = project_out(&random_symmetric(4, &mut rng), &rigid_motions(&carts, &[]));
        for d in 0..3 {
            assert!(max_norm(&(&fc * translation(4, d))) < 1e-12);
            assert!(max_norm(&(translation(4, d).transpose() * &fc).transpose()) < 1e-12);
        }
    }

    #[test]
    fn zero_dim_kills_rotations() {
        let mut rng = StdRng::seed_from_u64(3);
        let carts: Vec<V3> = (0..4).map(|_| V3(rng.gen())).collect();
        let basis = rigid_motions(&carts, &[Axis::X, Axis::Y, Axis::Z]);
        assert_eq!(basis.len(), 6);

        let fc = project_out(&random_symmetric(4, &mut rng), &basis);
        for axis in &[Axis::X, Axis::Y, Axis::Z] {
            let rotation: Vec<Complex64> = carts.iter()
                .flat_map(|x| axis.unit().cross(x).0.to_vec())
                .map(|x| Complex64::new(x, 0.0))
                .collect();
            assert!(max_norm(&(&fc * DVector::from_vec(rotation))) < 1e-10);
        }
    }

    #[test]
    fn linear_molecule_has_two_rotations() {
        let carts = vec![V3([0.0, 0.0, 0.0]), V3([0.0, 0.0, 1.1]), V3([0.0, 0.0, 2.3])];
        assert_eq!(rigid_motions(&carts, &[Axis::X, Axis::Y, Axis::Z]).len(), 5);
        assert_eq!(rigid_motions(&carts, &[Axis::Z]).len(), 3);
    }

    #[test]
    fn charges_become_neutral() {
        let charges = vec![M33::eye() * 2.0, M33::eye() * -1.5];
        let fixed = subtract_mean_charge(&charges);
        assert_close!(abs=1e-12, fixed[0] + fixed[1], M33::zero());
        assert_close!(abs=1e-12, fixed[0], M33::eye() * 1.75);
    }
}
