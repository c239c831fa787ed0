/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;

/// A reordering of atoms (or of any other per-index data).
///
/// Internally this stores the destination of every source index, which is
/// what symmetry operations naturally produce: "atom `b` is carried onto
/// atom `dest[b]`".
///
/// See the [`Permute`] trait for how it acts on data.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Perm {
    dest: Vec<usize>,
}

impl fmt::Debug for Perm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { write!(f, "Perm(dest={:?})", self.dest) }
}

#[derive(Debug, Fail)]
#[fail(display = "Tried to construct an invalid permutation: {:?}", _0)]
pub struct InvalidPermutationError(pub Vec<usize>);

impl Perm {
    pub fn eye(n: usize) -> Perm
    { Perm { dest: (0..n).collect() } }

    pub fn len(&self) -> usize
    { self.dest.len() }

    pub fn is_empty(&self) -> bool
    { self.dest.is_empty() }

    pub fn is_identity(&self) -> bool
    { self.dest.iter().enumerate().all(|(i, &d)| i == d) }

    /// Compute the `Perm` that, when applied to the input slice, would (stably) sort it.
    pub fn argsort<T: Ord>(xs: &[T]) -> Perm
    {
        let mut pull: Vec<_> = (0..xs.len()).collect();
        pull.sort_by(|&a, &b| xs[a].cmp(&xs[b]));
        Perm { dest: invert_raw(&pull) }
    }

    /// Construct a perm in "pull" form.
    ///
    /// If the `k`th element of the vector is `value`, then applying the
    /// permutation will *pull* the data at index `value` into index `k`.
    /// (this is how integer-array indexing behaves in numpy)
    pub fn from_vec(pull: Vec<usize>) -> Result<Perm, InvalidPermutationError>
    {
        validate(&pull)?;
        Ok(Perm { dest: invert_raw(&pull) })
    }

    /// Construct a perm in "push" form, the representation stored internally.
    ///
    /// If the `k`th element of the vector is `value`, then applying the
    /// permutation will *push* the data at index `k` over to index `value`.
    pub fn from_raw_inv(dest: Vec<usize>) -> Result<Perm, InvalidPermutationError>
    {
        validate(&dest)?;
        Ok(Perm { dest })
    }

    /// The "pull" form accepted by `from_vec`.
    pub fn into_vec(self) -> Vec<usize>
    { invert_raw(&self.dest) }

    /// The "push" form accepted by `from_raw_inv`.
    pub fn into_raw_inv(self) -> Vec<usize>
    { self.dest }

    #[must_use = "not an in-place operation"]
    pub fn inverted(&self) -> Perm
    { Perm { dest: invert_raw(&self.dest) } }

    /// Where the data at index `i` ends up. O(1).
    #[inline]
    pub fn permute_index(&self, i: usize) -> usize
    { self.dest[i] }

    /// Flipped group operator: `x.permuted_by(a).permuted_by(b) == x.permuted_by(&a.then(b))`.
    pub fn then(&self, other: &Perm) -> Perm
    {
        assert_eq!(self.len(), other.len(), "Incorrect permutation length");
        Perm { dest: self.dest.iter().map(|&d| other.dest[d]).collect() }
    }

    /// Conventional group operator: `a.of(b) == b.then(a)`.
    pub fn of(&self, other: &Perm) -> Perm
    { other.then(self) }
}

fn validate(xs: &[usize]) -> Result<(), InvalidPermutationError>
{
    let mut sorted = xs.to_vec();
    sorted.sort_unstable();
    match sorted.into_iter().eq(0..xs.len()) {
        true => Ok(()),
        false => Err(InvalidPermutationError(xs.to_vec())),
    }
}

fn invert_raw(xs: &[usize]) -> Vec<usize>
{
    let mut inv = vec![0; xs.len()];
    for (i, &x) in xs.iter().enumerate() {
        inv[x] = i;
    }
    inv
}

/// Trait for applying a permutation operation.
///
/// # Laws
///
/// * **Identity:** `data.permuted_by(&Perm::eye(n)) == data`
/// * **Compatibility:** `data.permuted_by(a).permuted_by(b) == data.permuted_by(&a.then(b))`
///
/// `Perm` itself implements `Permute`, which doubles as the group operator.
pub trait Permute: Sized {
    // the receiver gets permuted, not the argument, and not in place
    fn permuted_by(self, perm: &Perm) -> Self;
}

impl<T> Permute for Vec<T> {
    fn permuted_by(self, perm: &Perm) -> Vec<T>
    {
        assert_eq!(self.len(), perm.len(), "Incorrect permutation length");

        let mut out: Vec<Option<T>> = (0..self.len()).map(|_| None).collect();
        for (x, &d) in self.into_iter().zip(&perm.dest) {
            out[d] = Some(x);
        }
        out.into_iter().map(|x| x.expect("(BUG) permutation is not a bijection")).collect()
    }
}

impl Permute for Perm {
    fn permuted_by(self, perm: &Perm) -> Perm
    { self.then(perm) }
}
