/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Add, Sub, Mul, Div, Neg};
use std::ops::{AddAssign, SubAssign, MulAssign, DivAssign};

use num_complex::Complex64;

use crate::traits::{Semiring, Ring, Field};
use crate::types::{V3, M3, M33};

// NOTE: Operators are only defined between identically-typed elements.
//       Mixing e.g. a real rotation with a complex block goes through `map`.

// Generates the four owned/borrowed combinations of a binary operator.
macro_rules! binop {
    (
        [$X:ident: $Bound:ident]
        $Trait:ident::$method:ident($Lhs:ty, $Rhs:ty) -> $Out:ty,
        |$a:ident, $b:ident| $body:expr
    ) => {
        impl<$X: $Bound> $Trait<$Rhs> for $Lhs {
            type Output = $Out;

            #[inline]
            fn $method(self, rhs: $Rhs) -> $Out
            { let ($a, $b) = (self, rhs); $body }
        }

        impl<'a, $X: $Bound> $Trait<$Rhs> for &'a $Lhs {
            type Output = $Out;

            #[inline]
            fn $method(self, rhs: $Rhs) -> $Out
            { let ($a, $b) = (*self, rhs); $body }
        }

        impl<'b, $X: $Bound> $Trait<&'b $Rhs> for $Lhs {
            type Output = $Out;

            #[inline]
            fn $method(self, rhs: &'b $Rhs) -> $Out
            { let ($a, $b) = (self, *rhs); $body }
        }

        impl<'a, 'b, $X: $Bound> $Trait<&'b $Rhs> for &'a $Lhs {
            type Output = $Out;

            #[inline]
            fn $method(self, rhs: &'b $Rhs) -> $Out
            { let ($a, $b) = (*self, *rhs); $body }
        }
    };
}

// ---------------------------------------------------------------------------
// vector-vector

binop!{
    [X: Semiring] Add::add(V3<X>, V3<X>) -> V3<X>,
    |a, b| V3::from_fn(|k| a[k] + b[k])
}

binop!{
    [X: Ring] Sub::sub(V3<X>, V3<X>) -> V3<X>,
    |a, b| V3::from_fn(|k| a[k] - b[k])
}

// ---------------------------------------------------------------------------
// matrix-matrix

binop!{
    [X: Semiring] Add::add(M33<X>, M33<X>) -> M33<X>,
    |a, b| M33::from_fn(|r, c| a[r][c] + b[r][c])
}

binop!{
    [X: Ring] Sub::sub(M33<X>, M33<X>) -> M33<X>,
    |a, b| M33::from_fn(|r, c| a[r][c] - b[r][c])
}

binop!{
    [X: Semiring] Mul::mul(M33<X>, M33<X>) -> M33<X>,
    |a, b| M33::from_fn(|r, c| (0..3).map(|k| a[r][k] * b[k][c]).sum())
}

// ---------------------------------------------------------------------------
// matrix-vector

// matrix * column vector
binop!{
    [X: Semiring] Mul::mul(M33<X>, V3<X>) -> V3<X>,
    |m, v| V3::from_fn(|r| (0..3).map(|k| m[r][k] * v[k]).sum())
}

// row vector * matrix
binop!{
    [X: Semiring] Mul::mul(V3<X>, M33<X>) -> V3<X>,
    |v, m| V3::from_fn(|c| (0..3).map(|k| v[k] * m[k][c]).sum())
}

// ---------------------------------------------------------------------------
// scalar ops (scalar on the right)

impl<X: Semiring> Mul<X> for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, s: X) -> V3<X> { self.map(|x| x * s) }
}

impl<'a, X: Semiring> Mul<X> for &'a V3<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, s: X) -> V3<X> { *self * s }
}

impl<X: Field> Div<X> for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn div(self, s: X) -> V3<X> { self.map(|x| x / s) }
}

impl<X: Semiring> Mul<X> for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn mul(self, s: X) -> M33<X> { self.map(|x| x * s) }
}

impl<'a, X: Semiring> Mul<X> for &'a M33<X> {
    type Output = M33<X>;

    #[inline]
    fn mul(self, s: X) -> M33<X> { *self * s }
}

impl<X: Field> Div<X> for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn div(self, s: X) -> M33<X> { self.map(|x| x / s) }
}

// scalar on the left, for the concrete scalar types (orphan rules)
macro_rules! left_scalar_mul {
    ($($T:ty),*) => {$(
        impl Mul<V3<$T>> for $T {
            type Output = V3<$T>;

            #[inline]
            fn mul(self, v: V3<$T>) -> V3<$T> { v * self }
        }

        impl Mul<M33<$T>> for $T {
            type Output = M33<$T>;

            #[inline]
            fn mul(self, m: M33<$T>) -> M33<$T> { m * self }
        }
    )*};
}

left_scalar_mul!{ i32, f64, Complex64 }

// ---------------------------------------------------------------------------
// unary

impl<X: Ring> Neg for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn neg(self) -> V3<X> { self.map(|x| -x) }
}

impl<'a, X: Ring> Neg for &'a V3<X> {
    type Output = V3<X>;

    #[inline]
    fn neg(self) -> V3<X> { -*self }
}

impl<X: Ring> Neg for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn neg(self) -> M33<X> { self.map(|x| -x) }
}

// ---------------------------------------------------------------------------
// assign ops

macro_rules! assign_ops {
    ($($Cn:ident),*) => {$(
        impl<X, B> AddAssign<B> for $Cn<X> where $Cn<X>: Copy + Add<B, Output=$Cn<X>> {
            #[inline(always)]
            fn add_assign(&mut self, rhs: B) { *self = *self + rhs; }
        }

        impl<X, B> SubAssign<B> for $Cn<X> where $Cn<X>: Copy + Sub<B, Output=$Cn<X>> {
            #[inline(always)]
            fn sub_assign(&mut self, rhs: B) { *self = *self - rhs; }
        }

        impl<X, B> MulAssign<B> for $Cn<X> where $Cn<X>: Copy + Mul<B, Output=$Cn<X>> {
            #[inline(always)]
            fn mul_assign(&mut self, rhs: B) { *self = *self * rhs; }
        }

        impl<X, B> DivAssign<B> for $Cn<X> where $Cn<X>: Copy + Div<B, Output=$Cn<X>> {
            #[inline(always)]
            fn div_assign(&mut self, rhs: B) { *self = *self / rhs; }
        }
    )*};
}

assign_ops!{ V3, M3 }
