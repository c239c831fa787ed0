/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::Phonons;
use crate::consts::AMU_TO_RY;

use phonsym_array_types::V3;
use phonsym_structure::{Structure, Lattice, CoordsKind};
use phonsym_symmetry::Dynmat;

use num_complex::Complex64;

pub const SPRING: f64 = 0.01;
pub const CS_MASS: f64 = 132.905 * AMU_TO_RY;
pub const CL_MASS: f64 = 35.453 * AMU_TO_RY;

pub fn cscl() -> Structure
{
    Structure::new(
        Lattice::cubic(4.12),
        CoordsKind::Fracs(vec![V3([0.0, 0.0, 0.0]), V3([0.5, 0.5, 0.5])]),
        vec!["Cs", "Cl"],
    ).with_masses(vec![("Cs", CS_MASS), ("Cl", CL_MASS)])
}

/// Γ-point CsCl with central springs to the eight nearest neighbors.
pub fn cscl_phonons() -> Phonons
{
    let c = 8.0 * SPRING / 3.0;
    let dynmat = Dynmat::from_fn(6, 6, |i, j| {
        match (i % 3 == j % 3, i / 3 == j / 3) {
            (false, _) => Complex64::new(0.0, 0.0),
            (true, true) => Complex64::new(c, 0.0),
            (true, false) => Complex64::new(-c, 0.0),
        }
    });
    Phonons::from_parts(cscl(), vec![vec![V3::zero()]], vec![dynmat]).expect("fixture is consistent")
}

/// The optical frequency of `cscl_phonons`.
pub fn cscl_optical_frequency() -> f64
{ f64::sqrt(8.0 * SPRING / 3.0 * (1.0 / CS_MASS + 1.0 / CL_MASS)) }
