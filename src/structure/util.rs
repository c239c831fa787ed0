/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::IntPrecisionError;

use phonsym_array_types::M33;

// these f64 -> i32 conversions are written on a silly little type
// simply to avoid having a function with a signature like 'fn f(x: f64, tol: f64)'
// where the arguments could be swapped
pub(crate) struct Tol(pub(crate) f64);

impl Tol {
    pub(crate) fn unfloat(&self, x: f64) -> Result<i32, IntPrecisionError>
    {
        let r = x.round();
        if (r - x).abs() > self.0 {
            return Err(IntPrecisionError { value: x });
        }
        Ok(r as i32)
    }

    pub(crate) fn unfloat_m33(&self, m: &M33) -> Result<M33<i32>, IntPrecisionError>
    { m.try_map(|x| self.unfloat(x)) }
}
