/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Row-centric 3-vectors and 3x3 matrices.
//!
//! `V3 * M33` treats the vector as a row, `M33 * V3` treats it as a column.
//! Element types are limited to the scalars in [`traits`].

mod types;
mod ops;
mod methods_v;
mod methods_m;
pub mod traits;

pub use crate::types::{V3, M3, M33};
pub use crate::traits::{Semiring, Ring, Field};
pub use crate::methods_v::dot;

/// Functions for constructing matrices.
pub mod mat {
    use super::*;

    #[inline]
    pub fn from_array<X: Copy>(arr: [[X; 3]; 3]) -> M33<X>
    { M3([V3(arr[0]), V3(arr[1]), V3(arr[2])]) }

    #[inline]
    pub fn from_fn<X, F: FnMut(usize, usize) -> X>(f: F) -> M33<X>
    { M33::from_fn(f) }

    #[inline]
    pub fn eye<X: Semiring>() -> M33<X>
    { M33::eye() }
}
