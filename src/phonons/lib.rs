/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Harmonic phonons of a crystal.
//!
//! Units follow the dynamical matrix files these usually come from:
//! dynamical matrices are in Ry/bohr², masses in Rydberg mass units
//! (see [`consts::AMU_TO_RY`]), and frequencies in Ry. Positions and cells
//! are in Å, and q-points are cartesian in Å⁻¹ without a factor of 2π.

#[macro_use] extern crate failure;
#[macro_use] extern crate log;
#[macro_use] extern crate itertools;
#[cfg(test)] #[macro_use] extern crate phonsym_assert_close;

pub type FailResult<T> = Result<T, failure::Error>;

pub mod consts;
mod modes;
mod phonons;
mod thermal;
mod strain;

#[cfg(test)]
mod testing;

pub use crate::modes::{Modes, eigenvalue_to_frequency};
pub use crate::phonons::Phonons;
pub use crate::thermal::bose_occupation;
