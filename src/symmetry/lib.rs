/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Crystal symmetry enforcement for lattice dynamics.
//!
//! A [`SymmetryTable`] is discovered for a structure and a q-point, and then
//! drives the symmetrizers: dynamical matrices (under the little group of
//! q, and across a star), cartesian tensors with error propagation, vectors,
//! and positions. Acoustic sum rules live alongside.
//!
//! Cartesian q-points are in reciprocal length units with no factor of 2π;
//! a lattice translation `L` contributes a phase `exp(2πi q·L)`.

#[macro_use] extern crate failure;
#[macro_use] extern crate log;
#[macro_use] extern crate itertools;
#[macro_use] extern crate serde_derive;
#[cfg(test)] #[macro_use] extern crate phonsym_assert_close;

mod error;
pub mod blocks;
mod crystal;
pub mod backend;
mod asr;
mod table;
mod symmetrize;
pub mod qstar;
pub mod pipeline;
pub mod qgrid;
pub mod spglib;

#[cfg(test)]
mod testing;

//---------------------------
// public reexports; API

pub use crate::error::{SymmetryError, Result};
pub use crate::blocks::Dynmat;
pub use crate::crystal::Crystal;
pub use crate::backend::{SymmetryBackend, NativeBackend};
pub use crate::table::SymmetryTable;
pub use crate::asr::{AsrMode, Axis, impose_acoustic_sum_rule};
pub use crate::symmetrize::{
    symmetrize_dynamical_matrix,
    symmetrize_across_star,
    symmetrize_tensor,
    symmetrize_vector,
    symmetrize_positions,
};
pub use crate::qstar::{QStarPartition, partition, partition_present};
pub use crate::pipeline::symmetrize_fc_q;
