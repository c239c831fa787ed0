/* ************************************************************************ **
** This file is part of phonsym, and is licensed under EITHER the MIT      **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Partitioning of q-point lists into stars.

use crate::{Result, SymmetryError, SymmetryBackend, SymmetryTable};

use phonsym_array_types::V3;
use phonsym_soa_ops::Perm;

/// A list of q-points split into stars.
#[derive(Debug, Clone, PartialEq)]
pub struct QStarPartition {
    stars: Vec<Vec<V3>>,
    assignment: Vec<(usize, usize)>,
}

impl QStarPartition {
    /// Stars in order of discovery. Members are the caller's vectors, in the
    /// order the star was generated, so the first member of each star is the
    /// earliest input of that star.
    pub fn stars(&self) -> &[Vec<V3>]
    { &self.stars }

    pub fn into_stars(self) -> Vec<Vec<V3>>
    { self.stars }

    pub fn num_stars(&self) -> usize
    { self.stars.len() }

    pub fn num_q_points(&self) -> usize
    { self.assignment.len() }

    /// `(star, position within star)` for each input index.
    pub fn assignment(&self) -> &[(usize, usize)]
    { &self.assignment }

    /// The reordering that takes per-q data in input order to star-major
    /// order (use with `Permute::permuted_by`).
    pub fn star_major_perm(&self) -> Perm
    {
        let offsets: Vec<usize> = self.stars.iter()
            .scan(0, |acc, star| { let start = *acc; *acc += star.len(); Some(start) })
            .collect();
        let dest = self.assignment.iter().map(|&(star, pos)| offsets[star] + pos).collect();
        Perm::from_raw_inv(dest).expect("(BUG) star assignment is not a permutation")
    }

    /// All q-points, star-major.
    pub fn star_major_q_points(&self) -> Vec<V3>
    { self.stars.iter().flatten().cloned().collect() }
}

/// Split cartesian q-points into stars of the crystal's space group.
///
/// Every member of every star must be present in `qs` (`StarMemberNotFound`
/// otherwise), and no two inputs may be equivalent (`DuplicateQPoint`).
///
/// The table is rediscovered at Γ unless it already is there.
pub fn partition<B: SymmetryBackend>(table: &mut SymmetryTable<'_, B>, qs: &[V3]) -> Result<QStarPartition>
{ partition_impl(table, qs, Completeness::Required) }

/// Like `partition`, but star members absent from `qs` are skipped.
///
/// This is for lists that hold only some points of each star.
pub fn partition_present<B: SymmetryBackend>(table: &mut SymmetryTable<'_, B>, qs: &[V3]) -> Result<QStarPartition>
{ partition_impl(table, qs, Completeness::Partial) }

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Completeness { Required, Partial }

fn partition_impl<B: SymmetryBackend>(
    table: &mut SymmetryTable<'_, B>,
    qs: &[V3],
    completeness: Completeness,
) -> Result<QStarPartition>
{
    if !table.is_discovered_at(&V3::zero()) {
        table.discover_gamma()?;
    }

    for (i, a) in qs.iter().enumerate() {
        if let Some(b) = qs[i + 1..].iter().find(|b| table.q_equivalent(a, b)) {
            return Err(SymmetryError::DuplicateQPoint { q: *b });
        }
    }

    let mut remaining: Vec<usize> = (0..qs.len()).collect();
    let mut stars = vec![];
    let mut assignment = vec![(0, 0); qs.len()];
    while let Some(&first) = remaining.first() {
        let star_index = stars.len();
        let mut star = vec![];
        for member in table.star_of(&qs[first])? {
            let matches: Vec<usize> = (0..remaining.len())
                .filter(|&r| table.q_equivalent(&member, &qs[remaining[r]]))
                .collect();
            let r = match (matches.len(), completeness) {
                (1, _) => matches[0],
                (0, Completeness::Partial) => continue,
                (0, Completeness::Required) => return Err(SymmetryError::StarMemberNotFound { q: member }),
                _ => return Err(SymmetryError::DuplicateQPoint { q: member }),
            };
            let index = remaining.remove(r);
            assignment[index] = (star_index, star.len());
            star.push(qs[index]);
        }
        debug!("star {} has {} q-points", star_index, star.len());
        stars.push(star);
    }
    Ok(QStarPartition { stars, assignment })
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::testing;
    use phonsym_soa_ops::Permute;

    #[test]
    fn cubic_x_star() {
        let structure = testing::simple_cubic();
        let mut table = SymmetryTable::new(&structure, 1e-5).unwrap();
        let qs = vec![
            V3([0.0, 0.5, 0.0]),
            V3([0.0, 0.0, 0.0]),
            V3([0.5, 0.0, 0.0]),
            V3([0.0, 0.0, 0.5]),
        ];
        // (works from an undiscovered table)
        let partition = partition(&mut table, &qs).unwrap();
        assert!(table.is_discovered_at(&V3::zero()));

        assert_eq!(partition.num_stars(), 2);
        assert_eq!(partition.stars()[0].len(), 3);
        assert_eq!(partition.stars()[0][0], qs[0]);
        assert_eq!(partition.stars()[1], vec![qs[1]]);
        assert_eq!(partition.assignment()[1], (1, 0));
        assert_eq!(partition.assignment()[0], (0, 0));

        let sizes: usize = partition.stars().iter().map(Vec::len).sum();
        assert_eq!(sizes, qs.len());

        let reordered = qs.clone().permuted_by(&partition.star_major_perm());
        assert_eq!(reordered, partition.star_major_q_points());
        assert_eq!(reordered[3], qs[1]);
    }

    #[test]
    fn incomplete_list() {
        let structure = testing::simple_cubic();
        let mut table = SymmetryTable::new(&structure, 1e-5).unwrap();
        let qs = vec![V3([0.0, 0.0, 0.0]), V3([0.5, 0.0, 0.0])];

        match partition(&mut table, &qs) {
            Err(SymmetryError::StarMemberNotFound { .. }) => {},
            r => panic!("unexpected: {:?}", r),
        }

        let partition = partition_present(&mut table, &qs).unwrap();
        assert_eq!(partition.stars(), &[vec![qs[0]], vec![qs[1]]][..]);
        assert_eq!(partition.assignment(), &[(0, 0), (1, 0)][..]);
    }

    #[test]
    fn duplicates_are_rejected() {
        let structure = testing::simple_cubic();
        let mut table = SymmetryTable::new(&structure, 1e-5).unwrap();
        // equivalent through a reciprocal lattice vector
        let qs = vec![V3([0.5, 0.0, 0.0]), V3([0.0, 0.5, 0.0]), V3([-0.5, 0.0, 0.0])];
        match partition_present(&mut table, &qs) {
            Err(SymmetryError::DuplicateQPoint { q }) => assert_eq!(q, qs[2]),
            r => panic!("unexpected: {:?}", r),
        }
    }

    #[test]
    fn rediscovers_at_gamma() {
        let structure = testing::hcp();
        let mut table = SymmetryTable::new(&structure, 1e-5).unwrap();
        let m = V3([0.5, 0.0, 0.0]) * &structure.reciprocal().unwrap();
        table.discover_for_q_point(&m.0, false).unwrap();
        assert_eq!(table.operations().len(), 8);

        let star = table.star_of(&m).unwrap();
        let partition = partition(&mut table, &star).unwrap();
        assert_eq!(partition.num_stars(), 1);
        assert_eq!(table.operations().len(), 24);
    }
}
