/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Import of space group operations in the layout used by spglib.

use crate::{Result, SymmetryError};

use phonsym_array_types::{V3, mat};
use phonsym_structure::{FracRot, FracOp};

/// Build operations from spglib's `rotations` and `translations` arrays.
///
/// Both act on fractional column vectors (`x' = W x + t`), as `FracOp` does.
///
/// With `regularize`, each translation component is snapped to the nearest
/// multiple of 1/2. This cleans up numerical noise in groups whose
/// translations are all half-integral; it is wrong for anything else
/// (e.g. the 1/3 screws of hexagonal groups).
pub fn ops_from_spglib(
    rotations: &[[[i32; 3]; 3]],
    translations: &[[f64; 3]],
    regularize: bool,
) -> Result<Vec<FracOp>>
{
    if rotations.len() != translations.len() {
        return Err(SymmetryError::DimensionMismatch {
            what: "spglib translations", expected: rotations.len(), actual: translations.len(),
        });
    }

    izip!(rotations, translations).enumerate().map(|(index, (rot, trans))| {
        let rot = mat::from_array(*rot);
        if rot.det().abs() != 1 {
            return Err(SymmetryError::InvalidOperation { index });
        }
        let mut trans = V3(*trans);
        if regularize {
            trans = trans.map(|t| (2.0 * t + 0.5).floor() / 2.0);
        }
        Ok(FracOp::new(FracRot::new(&rot), trans))
    }).collect()
}
