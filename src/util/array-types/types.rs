/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use std::ops::{Deref, DerefMut};

use phonsym_assert_close::{CheckClose, CheckCloseError, Tolerances};

/// A 3-dimensional vector with operations for linear algebra.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct V3<X = f64>(pub [X; 3]);

/// A dense matrix with 3 rows.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct M3<V>(pub [V; 3]);

/// A square dense 3x3 matrix, stored as rows.
pub type M33<X = f64> = M3<V3<X>>;

macro_rules! array_like {
    ($($Cn:ident<$T:ident>),*) => {$(
        impl<$T> Deref for $Cn<$T> {
            type Target = [$T; 3];

            #[inline(always)]
            fn deref(&self) -> &[$T; 3] { &self.0 }
        }

        impl<$T> DerefMut for $Cn<$T> {
            #[inline(always)]
            fn deref_mut(&mut self) -> &mut [$T; 3] { &mut self.0 }
        }

        impl<'a, $T> IntoIterator for &'a $Cn<$T> {
            type Item = &'a $T;
            type IntoIter = std::slice::Iter<'a, $T>;

            #[inline(always)]
            fn into_iter(self) -> Self::IntoIter { self.0.iter() }
        }

        // no surrounding "V3(...)", so that debug output pastes into python
        impl<$T: fmt::Debug> fmt::Debug for $Cn<$T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
            { fmt::Debug::fmt(&self.0, f) }
        }
    )*};
}

array_like!{ V3<X>, M3<V> }

impl<X> From<[X; 3]> for V3<X> {
    #[inline(always)]
    fn from(arr: [X; 3]) -> Self { V3(arr) }
}

impl<X: Copy> From<[[X; 3]; 3]> for M33<X> {
    #[inline(always)]
    fn from(arr: [[X; 3]; 3]) -> Self { crate::mat::from_array(arr) }
}

impl<X: CheckClose> CheckClose for V3<X> {
    type Scalar = X::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self.0[..].check_close(&other.0[..], tol) }
}

impl<V: CheckClose> CheckClose for M3<V> {
    type Scalar = V::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self.0[..].check_close(&other.0[..], tol) }
}
