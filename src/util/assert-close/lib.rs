/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! `assert_close!(abs=.., rel=.., a, b)` and the `CheckClose` trait behind it.
//!
//! Both tolerance arguments are optional and may appear in either order.
//! A trailing format string may follow the compared values.

use std::fmt;
use num_complex::Complex64;

pub const DEFAULT_REL_TOL: f64 = 1e-9;

#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {
        $crate::__assert_close_parse!{
            @tol[$crate::DEFAULT_REL_TOL, 0.0] $($t)*
        }
    };
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            $crate::assert_close!{$($t)*}
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __assert_close_parse {
    (@tol[$rel:expr, $abs:expr] rel=$tol:expr, $($rest:tt)*) => {
        $crate::__assert_close_parse!{@tol[$tol, $abs] $($rest)*}
    };
    (@tol[$rel:expr, $abs:expr] abs=$tol:expr, $($rest:tt)*) => {
        $crate::__assert_close_parse!{@tol[$rel, $tol] $($rest)*}
    };
    (@tol[$rel:expr, $abs:expr] $a:expr, $b:expr $(,)*) => {
        $crate::__assert_close_parse!{@tol[$rel, $abs] $a, $b, "not nearly equal!"}
    };
    (@tol[$rel:expr, $abs:expr] $a:expr, $b:expr, $($fmt:tt)+) => {{
        let tol = $crate::Tolerances { rel: $rel, abs: $abs };
        let (a, b) = (&$a, &$b);
        if let Err(e) = $crate::CheckClose::check_close(a, b, tol) {
            panic!(
                "{} (tolerances: rel={}, abs={})\n left: {:?}\nright: {:?}\n{}",
                format!($($fmt)+), tol.rel, tol.abs, a, b, e,
            );
        }
    }};
}

/// Closeness test for scalars, in the style of Python's `math.isclose`.
pub fn is_close(a: f64, b: f64, Tolerances { abs, rel }: Tolerances) -> bool {
    assert!(rel >= 0.0);
    assert!(abs >= 0.0);

    // infinities of equal sign
    if a == b { return true; }
    if a.is_infinite() || b.is_infinite() { return false; }

    (a - b).abs() <= abs.max(rel * a.abs()).max(rel * b.abs())
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

/// The first pair of scalars that failed the comparison.
#[derive(Debug, Clone)]
pub struct CheckCloseError<T = f64> {
    pub values: (T, T),
    pub tol: Tolerances,
}

impl<T: fmt::Debug> std::error::Error for CheckCloseError<T> { }

impl<T: fmt::Debug> fmt::Display for CheckCloseError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = &self.values;
        write!(f, "failed at:\n  left: {:?}\n right: {:?}\n   tol: {:?}", left, right, self.tol)
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    type Scalar: fmt::Debug;

    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>;
}

impl CheckClose for f64 {
    type Scalar = f64;

    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), CheckCloseError<f64>> {
        match is_close(*self, *other, tol) {
            true => Ok(()),
            false => Err(CheckCloseError { values: (*self, *other), tol }),
        }
    }
}

// Real and imaginary parts are checked separately, so `abs` applies to each.
impl CheckClose for Complex64 {
    type Scalar = Complex64;

    fn check_close(&self, other: &Complex64, tol: Tolerances) -> Result<(), CheckCloseError<Complex64>> {
        match is_close(self.re, other.re, tol) && is_close(self.im, other.im, tol) {
            true => Ok(()),
            false => Err(CheckCloseError { values: (*self, *other), tol }),
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { (**self).check_close(*other, tol) }
}

impl<T: CheckClose> CheckClose for [T] {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    {
        assert_eq!(self.len(), other.len(), "length mismatch in check_close");
        self.iter().zip(other).map(|(a, b)| a.check_close(b, tol)).collect()
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self[..].check_close(&other[..], tol) }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self[..].check_close(&other[..], tol) }
}
