/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Input for the ISOTROPY `findsym` program.

use crate::FailResult;

use phonsym_array_types::V3;
use phonsym_structure::Structure;

use std::fmt::Write;

/// A keyword-style `findsym` input describing `structure`.
///
/// `lattice_tolerance` and `position_tolerance` are passed through as the
/// program's `latticeTolerance` and `atomicPositionTolerance`.
pub fn input_string(
    structure: &Structure,
    title: &str,
    lattice_tolerance: f64,
    position_tolerance: f64,
) -> FailResult<String>
{
    ensure!(!title.contains('\n'), "findsym titles must be a single line");
    let fracs = structure.to_fracs()?;
    let lattice = structure.require_lattice()?;

    let mut s = String::new();
    writeln!(s, "!useKeyWords")?;
    writeln!(s, "!title")?;
    writeln!(s, "{}", title)?;
    writeln!(s, "!latticeTolerance")?;
    writeln!(s, "{:.8}", lattice_tolerance)?;
    writeln!(s, "!atomicPositionTolerance")?;
    writeln!(s, "{:.8}", position_tolerance)?;
    writeln!(s, "!latticeBasisVectors")?;
    for &V3([x, y, z]) in lattice.vectors() {
        writeln!(s, "{:16.8} {:16.8} {:16.8}", x, y, z)?;
    }
    writeln!(s, "!atomCount")?;
    writeln!(s, "{}", structure.num_atoms())?;
    writeln!(s, "!atomType")?;
    writeln!(s, "{}", structure.species().join(" "))?;
    writeln!(s, "!atomPosition")?;
    for V3([x, y, z]) in fracs {
        writeln!(s, "{:16.8} {:16.8} {:16.8}", x, y, z)?;
    }
    Ok(s)
}
