/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::traits::{Semiring, Ring};
use crate::types::{V3, M3, M33};

impl<X> M33<X> {
    /// Construct a matrix from a function of `(row, col)`.
    #[inline(always)]
    pub fn from_fn<F: FnMut(usize, usize) -> X>(mut f: F) -> Self
    { M3([0, 1, 2].map(|r| V3([f(r, 0), f(r, 1), f(r, 2)]))) }

    /// Apply a function to each element.
    #[inline]
    pub fn map<B, F: FnMut(X) -> B>(self, mut f: F) -> M33<B>
    {
        let M3([a, b, c]) = self;
        M3([a.map(&mut f), b.map(&mut f), c.map(&mut f)])
    }

    #[inline]
    pub fn try_map<B, E, F>(self, mut f: F) -> Result<M33<B>, E>
    where F: FnMut(X) -> Result<B, E>,
    {
        let M3([a, b, c]) = self;
        Ok(M3([a.try_map(&mut f)?, b.try_map(&mut f)?, c.try_map(&mut f)?]))
    }

    #[inline]
    pub fn into_array(self) -> [[X; 3]; 3]
    {
        let M3([V3(a), V3(b), V3(c)]) = self;
        [a, b, c]
    }
}

impl<X: Copy> M33<X> {
    /// Transpose.
    #[inline]
    pub fn t(&self) -> Self
    { M33::from_fn(|r, c| self[c][r]) }

    #[inline]
    pub fn col(&self, c: usize) -> V3<X>
    { V3::from_fn(|r| self[r][c]) }
}

impl<X: Semiring> M33<X> {
    #[inline]
    pub fn zero() -> Self { M3([V3::zero(); 3]) }

    #[inline]
    pub fn eye() -> Self
    { M33::from_fn(|r, c| if r == c { X::one() } else { X::zero() }) }

    #[inline]
    pub fn trace(&self) -> X
    { self[0][0] + self[1][1] + self[2][2] }
}

impl<X: Ring> M33<X> {
    pub fn det(&self) -> X {
        let m = self;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Transposed cofactor matrix, so that `m * m.adjugate() == det * eye`.
    pub fn adjugate(&self) -> Self {
        let m = self;
        let cof = |r: usize, c: usize| {
            let (r1, r2) = ((r + 1) % 3, (r + 2) % 3);
            let (c1, c2) = ((c + 1) % 3, (c + 2) % 3);
            m[r1][c1] * m[r2][c2] - m[r1][c2] * m[r2][c1]
        };
        M33::from_fn(|r, c| cof(c, r))
    }
}

impl M33<f64> {
    /// Matrix inverse.
    ///
    /// Singular matrices produce non-finite elements.
    pub fn inv(&self) -> Self
    {
        let det = self.det();
        self.adjugate().map(|x| x / det)
    }

    /// Largest absolute element.
    pub fn max_abs(&self) -> f64
    { self.iter().flat_map(|row| row.iter()).fold(0.0, |acc, &x| acc.max(x.abs())) }
}

impl M33<i32> {
    /// Inverse of a unimodular integer matrix.
    ///
    /// Returns `None` when the determinant is not `±1`.
    pub fn inv_unimodular(&self) -> Option<Self>
    {
        match self.det() {
            1 => Some(self.adjugate()),
            -1 => Some(-self.adjugate()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::mat;

    #[test]
    fn get_inverse() {
        // inverse exactly representable in f64
        let matrix = mat::from_array([
            [2.0, 2.0, 0.0],
            [0.0, 4.0, 0.0],
            [0.0, 0.0, 2.0],
        ]);
        let exact_inverse = mat::from_array([
            [0.5, -0.25, 0.0],
            [0.0,  0.25, 0.0],
            [0.0,   0.0, 0.5],
        ]);
        assert_eq!(matrix.inv(), exact_inverse);
        assert_eq!(matrix * exact_inverse, M33::eye());
    }

    #[test]
    fn unimodular_inverse() {
        let m = mat::from_array([
            [0, -1, 0],
            [1, -1, 0],
            [0,  0, -1],
        ]);
        let inv = m.inv_unimodular().unwrap();
        assert_eq!(m * inv, M33::eye());
        assert_eq!(inv * m, M33::eye());

        let not_unimodular = mat::from_array([[2, 0, 0], [0, 1, 0], [0, 0, 1]]);
        assert_eq!(not_unimodular.inv_unimodular(), None);
    }
}
