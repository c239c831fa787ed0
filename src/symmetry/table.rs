/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Result, SymmetryError, Crystal};
use crate::backend::{SymmetryBackend, NativeBackend, MappedOp};

use phonsym_array_types::V3;
use phonsym_soa_ops::{Perm, Permute};
use phonsym_structure::{Structure, FracOp, is_lattice_symmetry};

use log::Level;

/// The symmetry operations of a crystal, and of the little group of one q-point.
///
/// A table starts out empty and is populated by [`SymmetryTable::discover_for_q_point`]
/// (or one of the explicit alternatives). Populating it again replaces everything.
///
/// The table always stores the full space group of the crystal, ordered so that
/// the little group of the current q-point is a prefix. [`SymmetryTable::operations`]
/// is that prefix; [`SymmetryTable::crystal_operations`] is the whole list. Atom
/// mappings, inverse indices, fractional shifts and the minus-q operation all
/// index into the whole list.
#[derive(Debug, Clone)]
pub struct SymmetryTable<'a, B = NativeBackend> {
    structure: &'a Structure,
    crystal: Crystal,
    threshold: f64,
    backend: B,
    discovered: Option<Discovered>,
}

#[derive(Debug, Clone)]
struct Discovered {
    q: V3,
    ops: Vec<FracOp>,
    num_little: usize,
    mapping: Vec<Perm>,
    inverse: Vec<usize>,
    shifts: Vec<Vec<V3>>,
    minus_q: Option<usize>,
}

impl<'a> SymmetryTable<'a, NativeBackend> {
    /// Fails with `InvalidStructure` if the structure has no unit cell.
    pub fn new(structure: &'a Structure, threshold: f64) -> Result<Self>
    { SymmetryTable::with_backend(structure, threshold, NativeBackend) }
}

impl<'a, B: SymmetryBackend> SymmetryTable<'a, B> {
    pub fn with_backend(structure: &'a Structure, threshold: f64, backend: B) -> Result<Self>
    {
        let crystal = Crystal::from_structure(structure)?;
        Ok(SymmetryTable { structure, crystal, threshold, backend, discovered: None })
    }

    /// Find the space group of the crystal and the little group of `q`.
    ///
    /// `q` is cartesian, in inverse units of the cell (without a factor of 2π).
    pub fn discover_for_q_point(&mut self, q: &[f64], verbose: bool) -> Result<()>
    {
        let q = parse_q(q)?;
        let rots = self.backend.find_bravais_operations(self.crystal.lattice(), self.threshold);
        let ops = self.backend.restrict_to_crystal(&rots, &self.crystal, self.threshold);

        let level = if verbose { Level::Info } else { Level::Debug };
        log!(level, "Lattice has {} point group operations.", rots.len());
        log!(level, "Crystal has {} space group operations.", ops.len());

        self.populate(q, ops, level)
    }

    /// `discover_for_q_point` at Γ: the little group is the whole space group.
    pub fn discover_gamma(&mut self) -> Result<()>
    { self.discover_for_q_point(&[0.0; 3], false) }

    /// Populate the table from operations in the `[W | t]` block form of
    /// [`SymmetryTable::export_operations`], rather than discovering them.
    ///
    /// Operations outside the little group of `q` are kept, but only as
    /// crystal operations.
    pub fn init_from_explicit_operations(&mut self, blocks: &[[[f64; 4]; 3]], q: &[f64]) -> Result<()>
    {
        let ops = blocks.iter().enumerate()
            .map(|(index, block)| {
                FracOp::from_block(block, self.threshold)
                    .map_err(|_| SymmetryError::InvalidOperation { index })
            })
            .collect::<Result<Vec<_>>>()?;
        self.init_from_operations(&ops, q)
    }

    /// Like `init_from_explicit_operations`, for operations already in typed form.
    pub fn init_from_operations(&mut self, ops: &[FracOp], q: &[f64]) -> Result<()>
    {
        let q = parse_q(q)?;
        for (index, op) in ops.iter().enumerate() {
            if !is_lattice_symmetry(self.crystal.lattice(), op.rot(), self.threshold) {
                return Err(SymmetryError::InvalidOperation { index });
            }
        }
        self.populate(q, ops.to_vec(), Level::Debug)
    }

    fn populate(&mut self, q: V3, ops: Vec<FracOp>, level: Level) -> Result<()>
    {
        // (done first so that errors refer to the caller's order)
        let mapping = self.backend.compute_atom_mapping(&ops, &self.crystal, self.threshold)?;

        let k = self.crystal.q_to_frac(&q);
        let little = self.backend.restrict_to_little_group(&ops, &self.crystal, &k, self.threshold);

        // little group first
        let mut pull = little.members.clone();
        pull.extend((0..ops.len()).filter(|i| !little.members.contains(i)));
        let reorder = Perm::from_vec(pull).expect("(BUG) little group members are distinct");

        let minus_q = little.minus_q.map(|i| reorder.permute_index(i));
        let ops = ops.permuted_by(&reorder);
        let mapping = mapping.permuted_by(&reorder);
        let shifts = self.backend.compute_fractional_shifts(&ops, &mapping, &self.crystal);
        let inverse = inverse_indices(&ops, &self.crystal, self.threshold)?;

        log!(level, "Little group of q = {:?} has {} operations.", q.0, little.members.len());
        match minus_q {
            Some(i) => log!(level, "Operation {} maps q to -q.", i),
            None => log!(level, "No operation maps q to -q."),
        }

        self.discovered = Some(Discovered {
            q, ops, mapping, inverse, shifts, minus_q,
            num_little: little.members.len(),
        });
        Ok(())
    }

    /// The little group operations as `[W | t]` blocks, in the table's order.
    pub fn export_operations(&self) -> Result<Vec<[[f64; 4]; 3]>>
    { Ok(self.discovered()?.little_group().iter().map(FracOp::to_block).collect()) }

    /// Takes effect at the next discovery; the current table is kept as is.
    pub fn change_threshold(&mut self, threshold: f64)
    { self.threshold = threshold; }
}

impl<'a, B> SymmetryTable<'a, B> {
    pub fn structure(&self) -> &'a Structure { self.structure }
    pub fn crystal(&self) -> &Crystal { &self.crystal }
    pub fn backend(&self) -> &B { &self.backend }
    pub fn threshold(&self) -> f64 { self.threshold }
    pub fn is_discovered(&self) -> bool { self.discovered.is_some() }

    /// The q-point of the last discovery.
    pub fn q_point(&self) -> Option<V3>
    { self.discovered.as_ref().map(|d| d.q) }

    /// Whether the table is discovered for a q-point equivalent to `q`.
    pub fn is_discovered_at(&self, q: &V3) -> bool
    { self.q_point().map_or(false, |prev| self.q_equivalent(&prev, q)) }

    /// The little group of the current q-point. Empty before discovery.
    pub fn operations(&self) -> &[FracOp]
    { self.discovered.as_ref().map_or(&[][..], |d| d.little_group()) }

    /// The whole space group, little group first. Empty before discovery.
    pub fn crystal_operations(&self) -> &[FracOp]
    { self.discovered.as_ref().map_or(&[][..], |d| &d.ops[..]) }

    /// The permutation sending each atom `b` to `g(b)`.
    pub fn atom_mapping(&self, op: usize) -> Option<&Perm>
    { self.discovered.as_ref().and_then(|d| d.mapping.get(op)) }

    pub fn inverse_index(&self, op: usize) -> Option<usize>
    { self.discovered.as_ref().and_then(|d| d.inverse.get(op).cloned()) }

    /// The cartesian lattice vector `R τ_b + f - τ_{g(b)}`.
    pub fn fractional_shift(&self, op: usize, atom: usize) -> Option<V3>
    { self.discovered.as_ref().and_then(|d| d.shifts.get(op)?.get(atom).cloned()) }

    /// Index of a crystal operation with `S q ≡ -q`.
    pub fn minus_q_operation(&self) -> Option<usize>
    { self.discovered.as_ref().and_then(|d| d.minus_q) }

    pub fn has_minus_q_operation(&self) -> bool
    { self.minus_q_operation().is_some() }

    /// Whether two cartesian q-points differ by a reciprocal lattice vector,
    /// up to the threshold.
    pub fn q_equivalent(&self, a: &V3, b: &V3) -> bool
    { self.crystal.q_equivalent(a, b, self.threshold) }

    fn discovered(&self) -> Result<&Discovered>
    { self.discovered.as_ref().ok_or(SymmetryError::NotInitialized) }

    pub(crate) fn require_discovered(&self) -> Result<()>
    { self.discovered().map(|_| ()) }

    /// Fails with `NotInitialized` before discovery.
    pub(crate) fn mapped_op(&self, index: usize) -> Result<MappedOp<'_>>
    {
        let d = self.discovered()?;
        Ok(MappedOp { op: &d.ops[index], perm: &d.mapping[index], shifts: &d.shifts[index] })
    }

    pub(crate) fn mapped_little_group(&self) -> Result<Vec<MappedOp<'_>>>
    { (0..self.discovered()?.num_little).map(|i| self.mapped_op(i)).collect() }

    pub(crate) fn mapped_crystal_operations(&self) -> Result<Vec<MappedOp<'_>>>
    { (0..self.discovered()?.ops.len()).map(|i| self.mapped_op(i)).collect() }

    pub(crate) fn little_group_mappings(&self) -> Result<&[Perm]>
    {
        let d = self.discovered()?;
        Ok(&d.mapping[..d.num_little])
    }

    pub(crate) fn crystal_mappings(&self) -> Result<&[Perm]>
    { Ok(&self.discovered()?.mapping[..]) }
}

impl<'a, B: SymmetryBackend> SymmetryTable<'a, B> {
    /// The star of a cartesian q-point under the whole space group, in
    /// cartesian coordinates. `q` itself comes first.
    pub fn star_of(&self, q: &V3) -> Result<Vec<V3>>
    {
        let ops = &self.discovered()?.ops;
        let star = self.backend.star_of_vector(&self.crystal.q_to_frac(q), ops, &self.crystal, self.threshold);
        Ok(star.members.iter().map(|k| self.crystal.q_from_frac(k)).collect())
    }
}

impl Discovered {
    fn little_group(&self) -> &[FracOp]
    { &self.ops[..self.num_little] }
}

pub(crate) fn parse_q(q: &[f64]) -> Result<V3>
{
    match *q {
        [x, y, z] => Ok(V3([x, y, z])),
        _ => Err(SymmetryError::InvalidQPoint { len: q.len() }),
    }
}

fn inverse_indices(ops: &[FracOp], crystal: &Crystal, threshold: f64) -> Result<Vec<usize>>
{
    let is_identity = |op: &FracOp| {
        op.rot().is_identity() && (op.trans().wrap_centered() * crystal.lattice()).norm() < threshold
    };

    (0..ops.len()).map(|i| {
        let inverse_rot = ops[i].rot().inverse();
        let candidates: Vec<usize> = (0..ops.len())
            .filter(|&j| *ops[j].rot() == inverse_rot)
            .collect();
        match candidates[..] {
            [] => Err(SymmetryError::MissingInverse { op: i }),
            [j] => Ok(j),
            // pure translations give several ops per rotation
            _ => candidates.iter().cloned()
                .find(|&j| is_identity(&ops[i].then(&ops[j])))
                .ok_or(SymmetryError::MissingInverse { op: i }),
        }
    }).collect()
}
