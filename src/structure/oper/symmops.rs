/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Lattice, IntPrecisionError};
use crate::util::Tol;

use phonsym_array_types::{V3, M33};
use phonsym_assert_close::{CheckClose, CheckCloseError, Tolerances};

// NOTE: Unlike most of this crate, the operators here are column-centric.
//
//  * A `FracRot` `W` maps a fractional column vector `x` to `W x`.
//  * The translation of a `FracOp` is added afterwards: `x' = W x + t`.
//
// This matches the conventions of most symmetry databases, so matrices can be
// moved in and out of this crate without transposing them.

/// A point group operation in fractional coordinates of some lattice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FracRot {
    /// Invariants:
    ///  - `abs(det(m)) == 1`
    m: M33<i32>,
}

/// A space group operation `x -> W x + t` in fractional coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FracOp {
    rot: FracRot,
    /// Invariants:
    ///  - elements lie in `0 <= x < 1`.
    trans: V3,
}

impl Default for FracRot {
    fn default() -> Self
    { Self::eye() }
}

impl Default for FracOp {
    fn default() -> Self
    { Self::eye() }
}

impl From<FracRot> for FracOp {
    fn from(rot: FracRot) -> Self
    { FracOp::new(rot, V3::zero()) }
}

impl FracRot {
    pub fn eye() -> Self
    { FracRot { m: M33::eye() } }

    /// Construct from an integer matrix acting on fractional column vectors.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not unimodular.
    pub fn new(m: &M33<i32>) -> FracRot
    {
        assert_eq!(m.det().abs(), 1, "rotation must be unimodular: {:?}", m);
        FracRot { m: *m }
    }

    /// Construct from a matrix of floats that should be nearly integral.
    pub fn from_float(m: &M33, tol: f64) -> Result<FracRot, IntPrecisionError>
    {
        let m = Tol(tol).unfloat_m33(m)?;
        match m.det().abs() {
            1 => Ok(FracRot { m }),
            // report something that clearly is not a valid rotation
            _ => Err(IntPrecisionError { value: f64::from(m.det()) }),
        }
    }

    /// Recover the fractional form of a cartesian rotation.
    ///
    /// This is the inverse of [`FracRot::cart`].
    pub fn from_cart(lattice: &Lattice, cart: &M33, tol: f64) -> Result<FracRot, IntPrecisionError>
    {
        let frac = lattice.inverse_matrix().t() * cart * lattice.matrix().t();
        FracRot::from_float(&frac, tol)
    }

    pub fn matrix(&self) -> &M33<i32>
    { &self.m }

    pub fn float_matrix(&self) -> M33
    { self.m.map(f64::from) }

    pub fn det(&self) -> i32
    { self.m.det() }

    pub fn is_identity(&self) -> bool
    { self.m == M33::eye() }

    /// The cartesian form `R = L^T W L^-T`, acting on cartesian column vectors.
    pub fn cart(&self, lattice: &Lattice) -> M33
    { lattice.matrix().t() * self.float_matrix() * lattice.inverse_matrix().t() }

    pub fn inverse(&self) -> FracRot
    {
        let m = self.m.inv_unimodular().expect("(BUG) FracRot is always unimodular");
        FracRot { m }
    }

    /// Flipped group operator.
    ///
    /// `a.then(b) == b.of(a)`: apply `a`, then `b`.
    pub fn then(&self, other: &FracRot) -> FracRot
    { FracRot { m: other.m * self.m } }

    /// Conventional group operator.
    pub fn of(&self, other: &FracRot) -> FracRot
    { other.then(self) }

    pub fn transform_frac(&self, frac: &V3) -> V3
    { self.float_matrix() * frac }

    pub fn transform_fracs(&self, fracs: &[V3]) -> Vec<V3>
    {
        let m = self.float_matrix();
        fracs.iter().map(|v| &m * v).collect()
    }

    /// Act on a wavevector given in fractional coordinates of the reciprocal lattice.
    ///
    /// Wavevectors transform contragrediently to positions: `k' = W^-T k`.
    pub fn transform_recip_frac(&self, k: &V3) -> V3
    { self.inverse().float_matrix().t() * k }
}

impl FracOp {
    pub fn eye() -> Self
    { FracOp { rot: FracRot::eye(), trans: V3::zero() } }

    /// The translation is reduced into `[0, 1)`.
    pub fn new(rot: FracRot, trans: V3) -> Self
    { FracOp { rot, trans: trans.wrap_positive() } }

    pub fn rot(&self) -> &FracRot
    { &self.rot }

    pub fn trans(&self) -> V3
    { self.trans }

    /// Build from the rows of an affine `[W | t]` block.
    pub fn from_block(block: &[[f64; 4]; 3], tol: f64) -> Result<FracOp, IntPrecisionError>
    {
        let rot = M33::from_fn(|r, c| block[r][c]);
        let trans = V3::from_fn(|r| block[r][3]);
        Ok(FracOp::new(FracRot::from_float(&rot, tol)?, trans))
    }

    pub fn to_block(&self) -> [[f64; 4]; 3]
    {
        let m = self.rot.float_matrix();
        let mut out = [[0.0; 4]; 3];
        for r in 0..3 {
            out[r][..3].copy_from_slice(&*m[r]);
            out[r][3] = self.trans[r];
        }
        out
    }

    /// Flipped group operator. (`a.then(b) == b.of(a)`)
    pub fn then(&self, other: &FracOp) -> FracOp
    {
        let rot = self.rot.then(&other.rot);
        let trans = other.rot.transform_frac(&self.trans) + other.trans;
        FracOp::new(rot, trans)
    }

    /// Conventional group operator.
    pub fn of(&self, other: &FracOp) -> FracOp
    { other.then(self) }

    pub fn inverse(&self) -> FracOp
    {
        let rot = self.rot.inverse();
        let trans = -rot.transform_frac(&self.trans);
        FracOp::new(rot, trans)
    }

    pub fn transform_frac(&self, frac: &V3) -> V3
    { self.rot.transform_frac(frac) + self.trans }

    pub fn transform_fracs(&self, fracs: &[V3]) -> Vec<V3>
    { fracs.iter().map(|v| self.transform_frac(v)).collect() }

    /// Equality with translations compared modulo lattice vectors.
    pub fn approx_eq(&self, other: &FracOp, tol: f64) -> bool
    {
        self.rot == other.rot
            && (self.trans - other.trans).wrap_centered().iter().all(|x| x.abs() <= tol)
    }
}

impl CheckClose for FracOp {
    type Scalar = f64;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<f64>>
    {
        assert_eq!(self.rot, other.rot, "rotations differ");
        let diff = (self.trans - other.trans).wrap_centered();
        diff.check_close(&V3::zero(), tol)
    }
}
