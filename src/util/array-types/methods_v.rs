/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::traits::{Semiring, Ring};
use crate::types::V3;

impl<X> V3<X> {
    /// Construct a vector from a function on indices.
    #[inline(always)]
    pub fn from_fn<F: FnMut(usize) -> X>(mut f: F) -> Self
    { V3([f(0), f(1), f(2)]) }

    /// Fallible form of `from_fn`.
    #[inline]
    pub fn try_from_fn<E, F>(mut f: F) -> Result<Self, E>
    where F: FnMut(usize) -> Result<X, E>,
    { Ok(V3([f(0)?, f(1)?, f(2)?])) }

    /// Apply a function to each element.
    #[inline(always)]
    pub fn map<B, F: FnMut(X) -> B>(self, mut f: F) -> V3<B>
    {
        let V3([a, b, c]) = self;
        V3([f(a), f(b), f(c)])
    }

    #[inline]
    pub fn try_map<B, E, F>(self, mut f: F) -> Result<V3<B>, E>
    where F: FnMut(X) -> Result<B, E>,
    {
        let V3([a, b, c]) = self;
        Ok(V3([f(a)?, f(b)?, f(c)?]))
    }
}

impl<X: Semiring> V3<X> {
    #[inline(always)]
    pub fn zero() -> Self { V3([X::zero(); 3]) }

    /// The unit vector along a Cartesian axis.
    pub fn axis_unit(i: usize) -> Self
    { V3::from_fn(|k| if k == i { X::one() } else { X::zero() }) }

    #[inline]
    pub fn dot(&self, other: &Self) -> X
    { (0..3).map(|k| self[k] * other[k]).sum() }

    #[inline]
    pub fn sqnorm(&self) -> X
    { self.dot(self) }

    /// Elementwise product.
    #[inline]
    pub fn mul_diag(&self, other: &Self) -> Self
    { V3::from_fn(|k| self[k] * other[k]) }
}

impl<X: Ring> V3<X> {
    pub fn cross(&self, other: &Self) -> Self {
        V3([
            self[1] * other[2] - self[2] * other[1],
            self[2] * other[0] - self[0] * other[2],
            self[0] * other[1] - self[1] * other[0],
        ])
    }
}

impl V3<f64> {
    #[inline]
    pub fn norm(&self) -> f64
    { self.sqnorm().sqrt() }

    /// Normalized copy of the vector.
    #[inline]
    pub fn unit(&self) -> Self
    { *self / self.norm() }

    /// Subtract the nearest integer from each element, giving values in `[-0.5, 0.5]`.
    #[inline]
    pub fn wrap_centered(&self) -> Self
    { self.map(|x| x - x.round()) }

    /// Reduce each element into `[0, 1)`.
    #[inline]
    pub fn wrap_positive(&self) -> Self
    {
        self.map(|x| {
            let y = x - x.floor();
            // tiny negative inputs round up to exactly 1.0
            if y >= 1.0 { 0.0 } else { y }
        })
    }
}

/// Free-function form of `V3::dot`.
#[inline(always)]
pub fn dot<X: Semiring>(a: &V3<X>, b: &V3<X>) -> X
{ a.dot(b) }

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn cross_is_right_handed() {
        let x = V3::<i32>::axis_unit(0);
        let y = V3::<i32>::axis_unit(1);
        assert_eq!(x.cross(&y), V3::axis_unit(2));
        assert_eq!(dot(&x, &y), 0);
    }

    #[test]
    fn wrapping() {
        let v = V3([1.25, -0.25, -1e-20]);
        assert_eq!(v.wrap_positive(), V3([0.25, 0.75, 0.0]));
        assert_eq!(v.wrap_centered(), V3([0.25, -0.25, -1e-20]));
    }
}
