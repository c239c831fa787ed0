/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Scalar traits, implemented on a closed set of types.
//!
//! These are sealed. You get `i32`, `f64` and `Complex64`, which is all that
//! symmetry operations and dynamical matrices ever need.

use std::fmt::Debug;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_complex::Complex64;
use num_traits::{One, Zero};

/// Scalars with addition and multiplication.
pub trait Semiring
    : private::Sealed + Copy + Default + Debug + PartialEq
    + Add<Output=Self> + Mul<Output=Self>
    + Zero + One + Sum
{ }

/// Scalars that are also closed under negation.
pub trait Ring: Semiring + Sub<Output=Self> + Neg<Output=Self> { }

/// Scalars that also support division.
pub trait Field: Ring + Div<Output=Self> { }

mod private {
    pub trait Sealed { }
}

macro_rules! impl_scalar {
    ($($T:ty: [$($Trait:ident),*];)*) => {$(
        impl private::Sealed for $T { }
        $( impl $Trait for $T { } )*
    )*};
}

impl_scalar!{
    i32: [Semiring, Ring];
    f64: [Semiring, Ring, Field];
    Complex64: [Semiring, Ring, Field];
}
