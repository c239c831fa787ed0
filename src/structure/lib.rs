/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Crystal structures, lattices, and the geometric half of symmetry analysis.
//!
//! Conventions: lattice matrices have lattice vectors as rows, so fractional
//! row vectors times the lattice give Cartesian coordinates. The reciprocal
//! lattice carries no factor of 2π.

#[macro_use] extern crate failure;
#[macro_use] extern crate log;
#[macro_use] extern crate itertools;
#[macro_use] extern crate lazy_static;
#[cfg(test)] #[macro_use] extern crate phonsym_assert_close;

#[derive(Debug, Fail)]
#[fail(display = "Not nearly an integer: {}", value)]
pub struct IntPrecisionError {
    pub value: f64,
}

mod core;
mod algo;
mod oper;
mod util;

//---------------------------
// public reexports; API

pub use crate::core::lattice::Lattice;
pub use crate::core::coords::CoordsKind;
pub use crate::core::structure::{Structure, StructureError};

pub use crate::oper::symmops::{FracRot, FracOp};

pub use crate::algo::find_perm;
pub use crate::algo::find_perm::PositionMatchError;
pub use crate::algo::rotations::{lattice_point_group, is_lattice_symmetry};
pub use crate::algo::nearest_image::{nearest_image_distance, nearest_image_frac_diff};
