/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Unit conversions.

pub const BOHR_TO_ANGSTROM: f64 = 0.52918;
pub const A_TO_BOHR: f64 = 1.889725989;

/// Frequency conversions from Ry.
pub const RY_TO_CM: f64 = 109737.37595;
pub const RY_TO_THZ: f64 = 3289.84377;

/// Boltzmann's constant, in Ry per Kelvin.
pub const K_TO_RY: f64 = 6.336857346553283e-6;

/// One atomic mass unit, in Rydberg mass units (twice the electron mass).
pub const AMU_TO_RY: f64 = 911.444243096;
